//! Table lifecycle: open -> closed (spinning) -> resolved
//!
//! Each step is a separate store call. Nothing here makes a spin or a
//! settlement atomic with respect to other requests on the same table.

use crate::{
    errors::{TableError, TableResult},
    games::{
        ball_placer::BallPlacer,
        types::{Bet, BetStatus, Table, TableId},
        winner_locator::WinnerLocator,
    },
    storage::{BetProvider, TableProvider},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dependencies of a [`TableService`]
pub struct TableServiceParams {
    pub tables: Arc<dyn TableProvider>,
    pub bets: Arc<dyn BetProvider>,
    pub ball_placer: Arc<dyn BallPlacer>,
    pub winner_locator: Arc<dyn WinnerLocator>,
}

/// Runs tables through their lifecycle
#[derive(Clone)]
pub struct TableService {
    tables: Arc<dyn TableProvider>,
    bets: Arc<dyn BetProvider>,
    ball_placer: Arc<dyn BallPlacer>,
    winner_locator: Arc<dyn WinnerLocator>,
}

impl TableService {
    pub fn new(params: TableServiceParams) -> Self {
        Self {
            tables: params.tables,
            bets: params.bets,
            ball_placer: params.ball_placer,
            winner_locator: params.winner_locator,
        }
    }

    /// Open a new table
    pub async fn create(&self) -> TableResult<Table> {
        let table = Table::open();

        self.tables
            .insert(&table)
            .await
            .map_err(TableError::CreateFailed)?;

        info!(table_id = %table.id, "table opened");
        Ok(table)
    }

    /// Close betting, put the table's bets live and draw the outcome.
    ///
    /// Spinning a table that is already closed draws a new outcome which
    /// replaces the previous one.
    pub async fn spin(&self, id: TableId) -> TableResult<Table> {
        self.tables.close(id).await.map_err(TableError::CloseFailed)?;

        self.bets
            .update_status_by_table(id, BetStatus::Live)
            .await
            .map_err(TableError::SpinFailed)?;

        let outcome = self.ball_placer.get_position();

        self.tables
            .set_outcome(id, outcome)
            .await
            .map_err(TableError::SetOutcomeFailed)?;

        info!(
            table_id = %id,
            position = outcome.position,
            colour = %outcome.colour,
            "table spun"
        );

        self.get(id).await
    }

    /// Settle every bet on a spun table and mark the winners
    pub async fn settle(&self, id: TableId) -> TableResult<Table> {
        let mut table = self.tables.get(id).await.map_err(TableError::FetchFailed)?;
        if table.outcome.is_none() {
            return Err(TableError::NotSpun(id));
        }

        self.bets
            .update_status_by_table(id, BetStatus::Settled)
            .await
            .map_err(TableError::SettleFailed)?;

        // a re-spun table is settled again from scratch
        table.bets = self.fetch_bets(id).await?;
        for bet in table.bets.iter_mut() {
            bet.win = false;
        }
        let mut table = self.winner_locator.locate(table)?;

        self.bets
            .set_winners(&table.bets)
            .await
            .map_err(TableError::SetWinnersFailed)?;

        let winners = table.bets.iter().filter(|b| b.win).count();
        info!(table_id = %id, bets = table.bets.len(), winners, "table settled");

        table.bets = self.fetch_bets(id).await?;
        Ok(table)
    }

    /// Fetch a table with its bets attached
    pub async fn get(&self, id: TableId) -> TableResult<Table> {
        let mut table = self.tables.get(id).await.map_err(TableError::FetchFailed)?;
        table.bets = self.fetch_bets(table.id).await?;
        Ok(table)
    }

    /// Every table with its bets. A table whose bets cannot be read is
    /// returned without them rather than failing the whole listing.
    pub async fn list(&self) -> TableResult<Vec<Table>> {
        let mut tables = self.tables.list().await.map_err(TableError::FetchFailed)?;

        for table in tables.iter_mut() {
            match self.bets.list_by_table(table.id).await {
                Ok(bets) => table.bets = bets,
                Err(e) => warn!(table_id = %table.id, error = %e, "skipping bets for table"),
            }
        }

        debug!(count = tables.len(), "tables listed");
        Ok(tables)
    }

    async fn fetch_bets(&self, id: TableId) -> TableResult<Vec<Bet>> {
        self.bets
            .list_by_table(id)
            .await
            .map_err(TableError::FetchBetsFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Entity, StoreError, StoreResult};
    use crate::games::types::{BetId, Outcome, Stake};
    use crate::games::winner_locator::PositionLocator;
    use crate::storage::{
        BetReader, BetWriter, MemoryBetStore, MemoryTableStore, TableReader, TableWriter,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Lands on each scripted position in turn, repeating the last one
    struct ScriptedBallPlacer {
        positions: Vec<u8>,
        draws: AtomicUsize,
    }

    impl ScriptedBallPlacer {
        fn new(positions: &[u8]) -> Self {
            Self { positions: positions.to_vec(), draws: AtomicUsize::new(0) }
        }
    }

    impl BallPlacer for ScriptedBallPlacer {
        fn get_position(&self) -> Outcome {
            let draw = self.draws.fetch_add(1, Ordering::SeqCst);
            let position = self.positions[draw.min(self.positions.len() - 1)];
            Outcome::at(position).expect("scripted position on wheel")
        }
    }

    /// Bet store double that fails the chosen operations
    #[derive(Default)]
    struct FailingBets {
        inner: MemoryBetStore,
        fail_list: bool,
        fail_update: bool,
        fail_set_winners: bool,
    }

    fn store_failure() -> StoreError {
        StoreError::bet_not_found(Uuid::nil())
    }

    #[async_trait]
    impl BetReader for FailingBets {
        async fn get(&self, id: BetId) -> StoreResult<Bet> {
            self.inner.get(id).await
        }

        async fn list_by_table(&self, table_id: TableId) -> StoreResult<Vec<Bet>> {
            if self.fail_list {
                return Err(store_failure());
            }
            self.inner.list_by_table(table_id).await
        }
    }

    #[async_trait]
    impl BetWriter for FailingBets {
        async fn insert(&self, bet: &Bet) -> StoreResult<()> {
            self.inner.insert(bet).await
        }

        async fn update_status_by_table(
            &self,
            table_id: TableId,
            status: BetStatus,
        ) -> StoreResult<()> {
            if self.fail_update {
                return Err(store_failure());
            }
            self.inner.update_status_by_table(table_id, status).await
        }

        async fn set_winners(&self, bets: &[Bet]) -> StoreResult<()> {
            if self.fail_set_winners {
                return Err(store_failure());
            }
            self.inner.set_winners(bets).await
        }
    }

    /// Table store double that fails the chosen operations
    #[derive(Default)]
    struct FailingTables {
        inner: MemoryTableStore,
        fail_insert: bool,
        fail_set_outcome: bool,
    }

    #[async_trait]
    impl TableReader for FailingTables {
        async fn get(&self, id: TableId) -> StoreResult<Table> {
            self.inner.get(id).await
        }

        async fn list(&self) -> StoreResult<Vec<Table>> {
            self.inner.list().await
        }
    }

    #[async_trait]
    impl TableWriter for FailingTables {
        async fn insert(&self, table: &Table) -> StoreResult<()> {
            if self.fail_insert {
                return Err(StoreError::DuplicateKey { entity: Entity::Table, id: table.id });
            }
            self.inner.insert(table).await
        }

        async fn close(&self, id: TableId) -> StoreResult<()> {
            self.inner.close(id).await
        }

        async fn set_outcome(&self, id: TableId, outcome: Outcome) -> StoreResult<()> {
            if self.fail_set_outcome {
                return Err(StoreError::table_not_found(id));
            }
            self.inner.set_outcome(id, outcome).await
        }
    }

    fn service_over(tables: Arc<dyn TableProvider>) -> TableService {
        TableService::new(TableServiceParams {
            tables,
            bets: Arc::new(MemoryBetStore::new()),
            ball_placer: Arc::new(ScriptedBallPlacer::new(&[7])),
            winner_locator: Arc::new(PositionLocator::new()),
        })
    }

    struct Fixture {
        service: TableService,
        tables: Arc<MemoryTableStore>,
        bets: Arc<dyn BetProvider>,
        placer: Arc<ScriptedBallPlacer>,
    }

    fn fixture_with(bets: Arc<dyn BetProvider>, position: u8) -> Fixture {
        scripted_fixture(bets, &[position])
    }

    fn scripted_fixture(bets: Arc<dyn BetProvider>, positions: &[u8]) -> Fixture {
        let tables = Arc::new(MemoryTableStore::new());
        let placer = Arc::new(ScriptedBallPlacer::new(positions));
        let service = TableService::new(TableServiceParams {
            tables: tables.clone(),
            bets: bets.clone(),
            ball_placer: placer.clone(),
            winner_locator: Arc::new(PositionLocator::new()),
        });
        Fixture { service, tables, bets, placer }
    }

    fn fixture(position: u8) -> Fixture {
        fixture_with(Arc::new(MemoryBetStore::new()), position)
    }

    async fn place(f: &Fixture, table: TableId, spaces: &[u8]) -> Bet {
        let bet = Bet::place(table, spaces.to_vec(), Stake::new(100, "GBP"));
        f.bets.insert(&bet).await.expect("insert bet");
        bet
    }

    #[tokio::test]
    async fn test_create_opens_table() {
        let f = fixture(0);

        let table = f.service.create().await.expect("create");

        assert!(!table.is_closed);
        assert!(table.outcome.is_none());
        assert!(table.bets.is_empty());
        assert_eq!(f.tables.get(table.id).await.expect("stored"), table);
    }

    #[tokio::test]
    async fn test_spin_resolves_table() {
        let f = fixture(16);
        let table = f.service.create().await.expect("create");
        let bet = place(&f, table.id, &[5]).await;

        let spun = f.service.spin(table.id).await.expect("spin");

        assert!(spun.is_resolved());
        assert_eq!(spun.outcome, Outcome::at(16));
        assert_eq!(spun.bets.len(), 1);
        assert_eq!(spun.bets[0].id, bet.id);
        assert_eq!(spun.bets[0].status, BetStatus::Live);
    }

    #[tokio::test]
    async fn test_spin_twice_redraws() {
        let f = fixture(7);
        let table = f.service.create().await.expect("create");

        f.service.spin(table.id).await.expect("first spin");
        let again = f.service.spin(table.id).await.expect("second spin");

        assert!(again.is_closed);
        assert_eq!(f.placer.draws.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_insert_failure() {
        let tables = Arc::new(FailingTables { fail_insert: true, ..Default::default() });
        let service = service_over(tables.clone());

        let err = service.create().await.unwrap_err();

        assert!(matches!(err, TableError::CreateFailed(StoreError::DuplicateKey { .. })));
        assert!(tables.inner.is_empty().await);
    }

    #[tokio::test]
    async fn test_spin_set_outcome_failure() {
        let tables = Arc::new(FailingTables { fail_set_outcome: true, ..Default::default() });
        let service = service_over(tables.clone());
        let table = service.create().await.expect("create");

        let err = service.spin(table.id).await.unwrap_err();

        assert!(matches!(err, TableError::SetOutcomeFailed(_)));
        let stored = tables.inner.get(table.id).await.expect("get");
        assert!(stored.is_closed);
        assert!(stored.outcome.is_none());
    }

    #[tokio::test]
    async fn test_spin_unknown_table() {
        let f = fixture(7);
        let id = Uuid::new_v4();

        let err = f.service.spin(id).await.unwrap_err();

        assert_eq!(err, TableError::CloseFailed(StoreError::table_not_found(id)));
        assert_eq!(f.placer.draws.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_spin_bet_update_failure() {
        let f = fixture_with(Arc::new(FailingBets { fail_update: true, ..Default::default() }), 7);
        let table = f.service.create().await.expect("create");

        let err = f.service.spin(table.id).await.unwrap_err();

        assert!(matches!(err, TableError::SpinFailed(_)));
    }

    #[tokio::test]
    async fn test_spin_bet_fetch_failure() {
        let f = fixture_with(Arc::new(FailingBets { fail_list: true, ..Default::default() }), 7);
        let table = f.service.create().await.expect("create");

        let err = f.service.spin(table.id).await.unwrap_err();

        assert!(matches!(err, TableError::FetchBetsFailed(_)));
        assert_eq!(f.tables.get(table.id).await.expect("get").outcome, Outcome::at(7));
    }

    #[tokio::test]
    async fn test_settle_losing_bet() {
        let f = fixture(16);
        let table = f.service.create().await.expect("create");
        place(&f, table.id, &[5]).await;
        f.service.spin(table.id).await.expect("spin");

        let settled = f.service.settle(table.id).await.expect("settle");

        assert_eq!(settled.bets.len(), 1);
        assert!(!settled.bets[0].win);
        assert_eq!(settled.bets[0].status, BetStatus::Settled);
        assert!(settled.bets[0].settled_at.is_some());
    }

    #[tokio::test]
    async fn test_settle_winning_bet() {
        let f = fixture(5);
        let table = f.service.create().await.expect("create");
        let winner = place(&f, table.id, &[5]).await;
        let loser = place(&f, table.id, &[6, 7]).await;
        f.service.spin(table.id).await.expect("spin");

        let settled = f.service.settle(table.id).await.expect("settle");

        for bet in &settled.bets {
            assert_eq!(bet.status, BetStatus::Settled);
            assert!(bet.settled_at.is_some());
            assert_eq!(bet.win, bet.id == winner.id);
        }
        assert!(f.bets.get(winner.id).await.expect("winner").win);
        assert!(!f.bets.get(loser.id).await.expect("loser").win);
    }

    #[tokio::test]
    async fn test_resettle_after_respin_clears_win() {
        let f = scripted_fixture(Arc::new(MemoryBetStore::new()), &[5, 16]);
        let table = f.service.create().await.expect("create");
        let bet = place(&f, table.id, &[5]).await;

        f.service.spin(table.id).await.expect("first spin");
        let first = f.service.settle(table.id).await.expect("first settle");
        assert!(first.bets[0].win);

        f.service.spin(table.id).await.expect("second spin");
        let second = f.service.settle(table.id).await.expect("second settle");

        assert_eq!(second.outcome, Outcome::at(16));
        assert_eq!(second.bets[0].status, BetStatus::Settled);
        assert!(!second.bets[0].win);
        assert!(!f.bets.get(bet.id).await.expect("bet").win);
    }

    #[tokio::test]
    async fn test_settle_unspun_table() {
        let f = fixture(5);
        let table = f.service.create().await.expect("create");
        let bet = place(&f, table.id, &[5]).await;

        let err = f.service.settle(table.id).await.unwrap_err();

        assert_eq!(err, TableError::NotSpun(table.id));
        assert_eq!(f.bets.get(bet.id).await.expect("bet"), bet);
    }

    #[tokio::test]
    async fn test_settle_unknown_table() {
        let f = fixture(5);
        let id = Uuid::new_v4();

        let err = f.service.settle(id).await.unwrap_err();

        assert_eq!(err, TableError::FetchFailed(StoreError::table_not_found(id)));
    }

    async fn spun_fixture(bets: FailingBets) -> (Fixture, TableId) {
        let f = fixture_with(Arc::new(bets), 5);
        let table = f.service.create().await.expect("create");
        f.tables
            .set_outcome(table.id, Outcome::at(5).expect("on wheel"))
            .await
            .expect("set outcome");
        (f, table.id)
    }

    #[tokio::test]
    async fn test_settle_bet_update_failure() {
        let (f, id) = spun_fixture(FailingBets { fail_update: true, ..Default::default() }).await;

        let err = f.service.settle(id).await.unwrap_err();

        assert!(matches!(err, TableError::SettleFailed(_)));
    }

    #[tokio::test]
    async fn test_settle_set_winners_failure() {
        let (f, id) = spun_fixture(FailingBets { fail_set_winners: true, ..Default::default() }).await;

        let err = f.service.settle(id).await.unwrap_err();

        assert!(matches!(err, TableError::SetWinnersFailed(_)));
    }

    #[tokio::test]
    async fn test_get_attaches_bets() {
        let f = fixture(5);
        let table = f.service.create().await.expect("create");
        let bet = place(&f, table.id, &[1, 2, 3]).await;

        let fetched = f.service.get(table.id).await.expect("get");

        assert_eq!(fetched.bets, vec![bet]);
    }

    #[tokio::test]
    async fn test_get_unknown_table() {
        let f = fixture(5);
        let id = Uuid::new_v4();

        assert_eq!(
            f.service.get(id).await.unwrap_err(),
            TableError::FetchFailed(StoreError::table_not_found(id))
        );
    }

    #[tokio::test]
    async fn test_list_empty() {
        let f = fixture(5);

        assert!(f.service.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_list_attaches_bets() {
        let f = fixture(5);
        let with_bet = f.service.create().await.expect("create");
        let without_bet = f.service.create().await.expect("create");
        let bet = place(&f, with_bet.id, &[9]).await;

        let tables = f.service.list().await.expect("list");

        assert_eq!(tables.len(), 2);
        for table in tables {
            if table.id == with_bet.id {
                assert_eq!(table.bets, vec![bet.clone()]);
            } else {
                assert_eq!(table.id, without_bet.id);
                assert!(table.bets.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_list_swallows_bet_failures() {
        let f = fixture_with(Arc::new(FailingBets { fail_list: true, ..Default::default() }), 5);
        f.service.create().await.expect("create");
        f.service.create().await.expect("create");

        let tables = f.service.list().await.expect("list");

        assert_eq!(tables.len(), 2);
        assert!(tables.iter().all(|t| t.bets.is_empty()));
    }
}
