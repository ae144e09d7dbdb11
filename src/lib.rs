//! Roulette - in-memory table and bet lifecycle service
//!
//! A table is created open, accepts bets until it is spun, then settles every
//! bet against the drawn pocket. Stores sit behind async traits so services
//! can be wired over any backend; the crate ships in-memory ones.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod services;
pub mod storage;

pub use config::{AppConfig, ConfigLoader};
pub use errors::{BetError, StoreError, TableError};
pub use games::types::{Bet, BetStatus, Colour, Outcome, Stake, Table};
pub use services::Services;
