//! In-memory storage for tables and bets
//!
//! Each store guards its own map with a readers-writer lock. There is no
//! transaction spanning both stores: callers that need several store calls
//! get each call atomically and nothing more.
//!
//! Consumers depend on the capability traits rather than the concrete stores
//! so tests can substitute their own implementations.

use crate::{
    errors::StoreResult,
    games::types::{Bet, BetId, BetStatus, Outcome, Table, TableId},
};
use async_trait::async_trait;

pub mod bets;
pub mod tables;

pub use bets::MemoryBetStore;
pub use tables::MemoryTableStore;

/// Read access to tables
#[async_trait]
pub trait TableReader: Send + Sync {
    /// Fetch a table. Bets are never attached at this layer.
    async fn get(&self, id: TableId) -> StoreResult<Table>;

    /// All tables, in no particular order
    async fn list(&self) -> StoreResult<Vec<Table>>;
}

/// Write access to tables
#[async_trait]
pub trait TableWriter: Send + Sync {
    async fn insert(&self, table: &Table) -> StoreResult<()>;

    /// Stop the table from accepting bets. Closing twice is not an error.
    async fn close(&self, id: TableId) -> StoreResult<()>;

    /// Record where the ball landed, replacing any earlier outcome
    async fn set_outcome(&self, id: TableId, outcome: Outcome) -> StoreResult<()>;
}

pub trait TableProvider: TableReader + TableWriter {}

impl<T: TableReader + TableWriter> TableProvider for T {}

/// Read access to bets
#[async_trait]
pub trait BetReader: Send + Sync {
    async fn get(&self, id: BetId) -> StoreResult<Bet>;

    /// Bets placed on a table, in no particular order. Empty if there are none.
    async fn list_by_table(&self, table_id: TableId) -> StoreResult<Vec<Bet>>;
}

/// Write access to bets
#[async_trait]
pub trait BetWriter: Send + Sync {
    async fn insert(&self, bet: &Bet) -> StoreResult<()>;

    /// Move every bet on the table to `status`, stamping `settled_at` when
    /// the new status is settled
    async fn update_status_by_table(&self, table_id: TableId, status: BetStatus) -> StoreResult<()>;

    /// Overwrite each bet wholesale by id
    async fn set_winners(&self, bets: &[Bet]) -> StoreResult<()>;
}

pub trait BetProvider: BetReader + BetWriter {}

impl<T: BetReader + BetWriter> BetProvider for T {}
