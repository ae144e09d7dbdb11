//! Error types for the roulette table system
//!
//! Stores return raw [`StoreError`]s. The services wrap them with the stage
//! that failed so the boundary layer can decide how to report them.

use crate::games::types::{BetId, TableId};
use std::fmt;
use uuid::Uuid;

/// Kind of record a store error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Table,
    Bet,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Table => write!(f, "table"),
            Entity::Bet => write!(f, "bet"),
        }
    }
}

/// Errors returned by the in-memory stores
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("could not locate {entity} {id}")]
    NotFound { entity: Entity, id: Uuid },

    #[error("duplicate key for {entity} {id}")]
    DuplicateKey { entity: Entity, id: Uuid },
}

impl StoreError {
    pub fn table_not_found(id: TableId) -> Self {
        StoreError::NotFound { entity: Entity::Table, id }
    }

    pub fn bet_not_found(id: BetId) -> Self {
        StoreError::NotFound { entity: Entity::Bet, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Errors raised while placing or reading bets
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BetError {
    #[error("table {0} is not accepting any more bets")]
    TableClosed(TableId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the table lifecycle, tagged with the failing stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("failed to create table")]
    CreateFailed(#[source] StoreError),

    #[error("failed to close table")]
    CloseFailed(#[source] StoreError),

    #[error("failed to spin table")]
    SpinFailed(#[source] StoreError),

    #[error("failed to set outcome on table")]
    SetOutcomeFailed(#[source] StoreError),

    #[error("failed to locate table")]
    FetchFailed(#[source] StoreError),

    #[error("failed to locate bets")]
    FetchBetsFailed(#[source] StoreError),

    #[error("failed to settle bets")]
    SettleFailed(#[source] StoreError),

    #[error("failed to set winners")]
    SetWinnersFailed(#[source] StoreError),

    #[error("table {0} has not been spun")]
    NotSpun(TableId),
}

impl TableError {
    /// Underlying store error, if the failure came from a store call
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            TableError::CreateFailed(e)
            | TableError::CloseFailed(e)
            | TableError::SpinFailed(e)
            | TableError::SetOutcomeFailed(e)
            | TableError::FetchFailed(e)
            | TableError::FetchBetsFailed(e)
            | TableError::SettleFailed(e)
            | TableError::SetWinnersFailed(e) => Some(e),
            TableError::NotSpun(_) => None,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type BetResult<T> = Result<T, BetError>;
pub type TableResult<T> = Result<T, TableError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let id = Uuid::new_v4();
        let err = StoreError::table_not_found(id);

        assert!(err.to_string().contains("could not locate table"));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_stage_error_keeps_source() {
        let store_err = StoreError::bet_not_found(Uuid::new_v4());
        let err = TableError::FetchBetsFailed(store_err.clone());

        assert_eq!(err.to_string(), "failed to locate bets");
        assert_eq!(err.source().map(|s| s.to_string()), Some(store_err.to_string()));
        assert_eq!(err.store_error(), Some(&store_err));
    }

    #[test]
    fn test_error_conversion() {
        let store_err = StoreError::DuplicateKey { entity: Entity::Bet, id: Uuid::new_v4() };
        let bet_err: BetError = store_err.into();

        match bet_err {
            BetError::Store(StoreError::DuplicateKey { entity: Entity::Bet, .. }) => {}
            other => panic!("Expected duplicate key error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_spun_has_no_store_source() {
        let err = TableError::NotSpun(Uuid::new_v4());
        assert!(err.store_error().is_none());
        assert!(err.source().is_none());
    }
}
