pub mod connection;
pub mod progress;
pub mod records;
pub mod setup;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use records::{ACTORS_TABLE, ARCHIVE_TABLE, TOURNAMENT_TABLE};
