//! API Request and Response Models
//!
//! Wire shapes use camelCase field names.

use crate::games::types::{Bet, BetId, BetStatus, Outcome, Stake, Table, TableId, MAX_POSITION};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Body of `POST /v1/tables/:id/bet`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    pub selected_spaces: Vec<i64>,
    pub stake: Stake,
}

impl BetRequest {
    /// Validate the request and build an unsettled bet on `table`
    pub fn into_bet(self, table: TableId) -> Result<Bet, String> {
        if self.selected_spaces.is_empty() {
            return Err("selectedSpaces must not be empty".to_string());
        }

        let spaces = self
            .selected_spaces
            .iter()
            .map(|&space| {
                u8::try_from(space)
                    .ok()
                    .filter(|p| *p <= MAX_POSITION)
                    .ok_or_else(|| format!("space {} is outside 0-{}", space, MAX_POSITION))
            })
            .collect::<Result<Vec<u8>, String>>()?;

        if self.stake.amount <= 0 {
            return Err("stake amount must be positive".to_string());
        }
        if !self.stake.has_iso_currency() {
            return Err(format!("'{}' is not an ISO 4217 currency code", self.stake.currency));
        }

        Ok(Bet::place(table, spaces, self.stake))
    }
}

/// A bet as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BetResponse {
    pub id: BetId,
    pub placed_at: DateTime<Utc>,
    pub status: BetStatus,
    pub settled_at: Option<DateTime<Utc>>,
    pub win: bool,
    pub selected_spaces: Vec<u8>,
    pub stake: Stake,
    pub table: TableId,
}

impl From<Bet> for BetResponse {
    fn from(bet: Bet) -> Self {
        Self {
            id: bet.id,
            placed_at: bet.placed_at,
            status: bet.status,
            settled_at: bet.settled_at,
            win: bet.win,
            selected_spaces: bet.selected_spaces,
            stake: bet.stake,
            table: bet.table,
        }
    }
}

impl From<BetResponse> for Bet {
    fn from(response: BetResponse) -> Self {
        Self {
            id: response.id,
            table: response.table,
            selected_spaces: response.selected_spaces,
            stake: response.stake,
            status: response.status,
            placed_at: response.placed_at,
            settled_at: response.settled_at,
            win: response.win,
        }
    }
}

/// A table with its bets as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub id: TableId,
    pub bets: Vec<BetResponse>,
    pub is_closed: bool,
    pub outcome: Option<Outcome>,
}

impl From<Table> for TableResponse {
    fn from(table: Table) -> Self {
        Self {
            id: table.id,
            bets: table.bets.into_iter().map(BetResponse::from).collect(),
            is_closed: table.is_closed,
            outcome: table.outcome,
        }
    }
}
