mod actors;
pub mod models;
pub mod pairing;
mod results;
mod tournament;

#[cfg(test)]
pub(crate) mod testing;

pub use actors::{ActorDirectory, Enrollment, NewActor};
pub use models::*;
pub use pairing::{build_round, DuplicateOpponentUnavoidable, PairedRound};
pub use results::Credit;
