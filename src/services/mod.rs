pub mod registry;
pub mod session;
pub mod snapshot;

pub use registry::RegistryService;
pub use session::{SessionService, TournamentDraft};
