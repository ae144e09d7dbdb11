//! Service layer with explicit dependency injection
//!
//! Stores are created by the caller and handed to the services, so tests can
//! run against isolated store instances.

use crate::{
    games::{
        ball_placer::{BallPlacer, CryptoBallPlacer},
        winner_locator::{PositionLocator, WinnerLocator},
    },
    storage::{BetProvider, MemoryBetStore, MemoryTableStore, TableProvider},
};
use std::sync::Arc;

pub mod bets;
pub mod tables;

pub use bets::BetService;
pub use tables::{TableService, TableServiceParams};

/// Service container shared by request handlers
#[derive(Clone)]
pub struct Services {
    pub tables: TableService,
    pub bets: BetService,
}

impl Services {
    /// Wire both services over the given stores
    pub fn new<T, B>(
        table_store: Arc<T>,
        bet_store: Arc<B>,
        ball_placer: Arc<dyn BallPlacer>,
        winner_locator: Arc<dyn WinnerLocator>,
    ) -> Self
    where
        T: TableProvider + 'static,
        B: BetProvider + 'static,
    {
        let bets = BetService::new(bet_store.clone(), table_store.clone());
        let tables = TableService::new(TableServiceParams {
            tables: table_store,
            bets: bet_store,
            ball_placer,
            winner_locator,
        });

        Self { tables, bets }
    }

    /// Fresh in-memory stores with a CSPRNG ball placer
    pub fn in_memory() -> Self {
        Self::with_ball_placer(Arc::new(CryptoBallPlacer::new()))
    }

    /// Fresh in-memory stores with a custom ball placer
    pub fn with_ball_placer(ball_placer: Arc<dyn BallPlacer>) -> Self {
        Self::new(
            Arc::new(MemoryTableStore::new()),
            Arc::new(MemoryBetStore::new()),
            ball_placer,
            Arc::new(PositionLocator::new()),
        )
    }
}
