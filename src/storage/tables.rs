use super::{TableReader, TableWriter};
use crate::{
    errors::{Entity, StoreError, StoreResult},
    games::types::{Outcome, Table, TableId},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Stored form of a table. Bets live in the bet store.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableRow {
    id: TableId,
    is_closed: bool,
    outcome: Option<Outcome>,
}

impl From<&Table> for TableRow {
    fn from(table: &Table) -> Self {
        Self {
            id: table.id,
            is_closed: table.is_closed,
            outcome: table.outcome,
        }
    }
}

impl From<&TableRow> for Table {
    fn from(row: &TableRow) -> Self {
        Self {
            id: row.id,
            bets: Vec::new(),
            is_closed: row.is_closed,
            outcome: row.outcome,
        }
    }
}

/// Holds every created table
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<TableId, TableRow>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.is_empty()
    }
}

#[async_trait]
impl TableReader for MemoryTableStore {
    async fn get(&self, id: TableId) -> StoreResult<Table> {
        let tables = self.tables.read().await;
        tables
            .get(&id)
            .map(Table::from)
            .ok_or_else(|| StoreError::table_not_found(id))
    }

    async fn list(&self) -> StoreResult<Vec<Table>> {
        let tables = self.tables.read().await;
        Ok(tables.values().map(Table::from).collect())
    }
}

#[async_trait]
impl TableWriter for MemoryTableStore {
    async fn insert(&self, table: &Table) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&table.id) {
            return Err(StoreError::DuplicateKey {
                entity: Entity::Table,
                id: table.id,
            });
        }

        tables.insert(table.id, TableRow::from(table));
        Ok(())
    }

    async fn close(&self, id: TableId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&id)
            .ok_or_else(|| StoreError::table_not_found(id))?;

        row.is_closed = true;
        Ok(())
    }

    async fn set_outcome(&self, id: TableId, outcome: Outcome) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&id)
            .ok_or_else(|| StoreError::table_not_found(id))?;

        row.outcome = Some(outcome);
        Ok(())
    }
}
