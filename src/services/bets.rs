use crate::{
    errors::{BetError, BetResult},
    games::types::{Bet, BetId},
    storage::{BetProvider, TableReader},
};
use std::sync::Arc;
use tracing::debug;

/// Places bets on open tables
#[derive(Clone)]
pub struct BetService {
    bets: Arc<dyn BetProvider>,
    tables: Arc<dyn TableReader>,
}

impl BetService {
    pub fn new(bets: Arc<dyn BetProvider>, tables: Arc<dyn TableReader>) -> Self {
        Self { bets, tables }
    }

    /// Store a bet if its table exists and is still open
    pub async fn create(&self, bet: Bet) -> BetResult<Bet> {
        let table = self.tables.get(bet.table).await?;
        if table.is_closed {
            return Err(BetError::TableClosed(table.id));
        }

        self.bets.insert(&bet).await?;
        debug!(bet_id = %bet.id, table_id = %bet.table, "bet stored");

        Ok(bet)
    }

    pub async fn get(&self, id: BetId) -> BetResult<Bet> {
        Ok(self.bets.get(id).await?)
    }
}
