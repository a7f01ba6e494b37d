use anyhow::Context as _;
use thiserror::Error;

/// Failures raised by the tournament engine and the persistence codec.
///
/// Every variant leaves the state it was raised from untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TournamentError {
    #[error("pairing needs {expected} distinct players, found {found}")]
    InsufficientRoster { expected: usize, found: usize },

    #[error("a roster must hold exactly {expected} distinct players, got {found}")]
    RosterSize { expected: usize, found: usize },

    #[error("player {player_id} belongs to tournament {found}, not {expected}")]
    ForeignPlayer {
        player_id: u32,
        expected: String,
        found: String,
    },

    #[error("malformed round results: {0}")]
    MalformedResult(String),

    #[error("cannot {operation} while tournament is {state}")]
    StateSequence { operation: String, state: String },

    #[error("corrupt {entity} record: {reason}")]
    CorruptRecord { entity: &'static str, reason: String },

    #[error("unknown actor id: {0}")]
    UnknownActor(String),

    #[error("every {width}-digit identifier is already taken")]
    IdentifiersExhausted { width: usize },
}

impl TournamentError {
    pub fn corrupt(entity: &'static str, reason: impl Into<String>) -> Self {
        TournamentError::CorruptRecord {
            entity,
            reason: reason.into(),
        }
    }
}

/// Add context to store errors
pub fn store_context(operation: &str, table: &str) -> String {
    format!("Failed to {} table: {}", operation, table)
}

/// Add context to record decoding errors
pub fn record_context(entity: &str) -> String {
    format!("Failed to restore {} from store", entity)
}

/// Wrap result with store context
pub fn with_store_context<T, E>(result: Result<T, E>, operation: &str, table: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(store_context(operation, table))
}

/// Wrap result with record context
pub fn with_record_context<T, E>(result: Result<T, E>, entity: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(record_context(entity))
}
