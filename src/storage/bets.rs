use super::{BetReader, BetWriter};
use crate::{
    errors::{Entity, StoreError, StoreResult},
    games::types::{Bet, BetId, BetStatus, TableId},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Holds every placed bet
#[derive(Debug, Default)]
pub struct MemoryBetStore {
    bets: RwLock<HashMap<BetId, Bet>>,
}

impl MemoryBetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bets.read().await.is_empty()
    }
}

#[async_trait]
impl BetReader for MemoryBetStore {
    async fn get(&self, id: BetId) -> StoreResult<Bet> {
        let bets = self.bets.read().await;
        bets.get(&id)
            .cloned()
            .ok_or_else(|| StoreError::bet_not_found(id))
    }

    async fn list_by_table(&self, table_id: TableId) -> StoreResult<Vec<Bet>> {
        let bets = self.bets.read().await;
        Ok(bets
            .values()
            .filter(|bet| bet.table == table_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BetWriter for MemoryBetStore {
    async fn insert(&self, bet: &Bet) -> StoreResult<()> {
        let mut bets = self.bets.write().await;
        if bets.contains_key(&bet.id) {
            return Err(StoreError::DuplicateKey {
                entity: Entity::Bet,
                id: bet.id,
            });
        }

        bets.insert(bet.id, bet.clone());
        Ok(())
    }

    async fn update_status_by_table(&self, table_id: TableId, status: BetStatus) -> StoreResult<()> {
        let settled_at = (status == BetStatus::Settled).then(Utc::now);

        let mut bets = self.bets.write().await;
        for bet in bets.values_mut().filter(|bet| bet.table == table_id) {
            bet.status = status;
            if settled_at.is_some() {
                bet.settled_at = settled_at;
            }
        }

        Ok(())
    }

    async fn set_winners(&self, winners: &[Bet]) -> StoreResult<()> {
        let mut bets = self.bets.write().await;
        for bet in winners {
            bets.insert(bet.id, bet.clone());
        }

        Ok(())
    }
}
