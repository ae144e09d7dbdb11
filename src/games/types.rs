use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type TableId = Uuid;
pub type BetId = Uuid;

/// Highest position on a single-zero wheel
pub const MAX_POSITION: u8 = 36;

/// Pocket colour
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Black,
    Green,
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colour::Red => write!(f, "red"),
            Colour::Black => write!(f, "black"),
            Colour::Green => write!(f, "green"),
        }
    }
}

use self::Colour::{Black as B, Green as G, Red as R};

/// Colour of every pocket, indexed by position
const POCKET_COLOURS: [Colour; 37] = [
    G, // 0
    R, B, R, B, R, B, R, B, R, B, // 1-10
    B, R, B, R, B, R, B, R, R, B, // 11-20
    R, B, R, B, R, B, R, B, B, R, // 21-30
    B, R, B, R, B, R, // 31-36
];

/// Colour of a position, `None` if it is off the wheel
pub fn colour_of(position: u8) -> Option<Colour> {
    POCKET_COLOURS.get(position as usize).copied()
}

/// Where the ball landed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub position: u8,
    pub colour: Colour,
}

impl Outcome {
    /// Build an outcome for a position using the fixed wheel colouring
    pub fn at(position: u8) -> Option<Self> {
        colour_of(position).map(|colour| Self { position, colour })
    }
}

/// Bet lifecycle: unsettled -> live -> settled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Unsettled,
    Live,
    Settled,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Unsettled => write!(f, "unsettled"),
            BetStatus::Live => write!(f, "live"),
            BetStatus::Settled => write!(f, "settled"),
        }
    }
}

/// Monetary stake in minor units (pence, cents) of an ISO 4217 currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Stake {
    pub amount: i64,
    pub currency: String,
}

impl Stake {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Three upper-case ASCII letters, e.g. "GBP"
    pub fn has_iso_currency(&self) -> bool {
        self.currency.len() == 3 && self.currency.bytes().all(|b| b.is_ascii_uppercase())
    }
}

/// A stake placed against a set of positions on one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bet {
    pub id: BetId,
    pub table: TableId,
    pub selected_spaces: Vec<u8>,
    pub stake: Stake,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
    pub win: bool,
}

impl Bet {
    /// Create a fresh unsettled bet with a generated id
    pub fn place(table: TableId, selected_spaces: Vec<u8>, stake: Stake) -> Self {
        Self {
            id: Uuid::new_v4(),
            table,
            selected_spaces,
            stake,
            status: BetStatus::Unsettled,
            placed_at: Utc::now(),
            settled_at: None,
            win: false,
        }
    }

    pub fn covers(&self, position: u8) -> bool {
        self.selected_spaces.contains(&position)
    }
}

/// One play of roulette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub bets: Vec<Bet>,
    pub is_closed: bool,
    pub outcome: Option<Outcome>,
}

impl Table {
    /// New open table with a generated id
    pub fn open() -> Self {
        Self {
            id: Uuid::new_v4(),
            bets: Vec::new(),
            is_closed: false,
            outcome: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.is_closed && self.outcome.is_some()
    }
}
