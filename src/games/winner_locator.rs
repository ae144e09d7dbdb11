use crate::errors::{TableError, TableResult};
use crate::games::types::Table;

/// Marks the winning bets of a resolved table
pub trait WinnerLocator: Send + Sync {
    fn locate(&self, table: Table) -> TableResult<Table>;
}

/// Straight-up matching: a bet wins when it covers the outcome position
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionLocator;

impl PositionLocator {
    pub fn new() -> Self {
        Self
    }
}

impl WinnerLocator for PositionLocator {
    fn locate(&self, mut table: Table) -> TableResult<Table> {
        let outcome = table.outcome.ok_or(TableError::NotSpun(table.id))?;

        // losing bets keep whatever flag they had
        for bet in table.bets.iter_mut().filter(|b| b.covers(outcome.position)) {
            bet.win = true;
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::types::{Bet, Outcome, Stake};

    fn table_with(outcome: Option<Outcome>, selections: &[&[u8]]) -> Table {
        let mut table = Table::open();
        table.outcome = outcome;
        table.bets = selections
            .iter()
            .map(|s| Bet::place(table.id, s.to_vec(), Stake::new(100, "GBP")))
            .collect();
        table
    }

    #[test]
    fn test_marks_covering_bets() {
        let table = table_with(Outcome::at(16), &[&[14, 16], &[14], &[]]);

        let located = PositionLocator::new().locate(table).expect("locate");

        let wins: Vec<bool> = located.bets.iter().map(|b| b.win).collect();
        assert_eq!(wins, vec![true, false, false]);
    }

    #[test]
    fn test_zero_is_a_winning_position() {
        let table = table_with(Outcome::at(0), &[&[0], &[1]]);

        let located = PositionLocator::new().locate(table).expect("locate");

        assert!(located.bets[0].win);
        assert!(!located.bets[1].win);
    }

    #[test]
    fn test_existing_win_is_not_reset() {
        let mut table = table_with(Outcome::at(3), &[&[7]]);
        table.bets[0].win = true;

        let located = PositionLocator::new().locate(table).expect("locate");

        assert!(located.bets[0].win);
    }

    #[test]
    fn test_rejects_table_without_outcome() {
        let table = table_with(None, &[&[5]]);
        let id = table.id;

        let err = PositionLocator::new().locate(table).unwrap_err();

        assert_eq!(err, TableError::NotSpun(id));
    }
}
