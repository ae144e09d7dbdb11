pub mod types;
pub mod ball_placer;
pub mod winner_locator;

pub use types::*;
pub use ball_placer::{BallPlacer, CryptoBallPlacer};
pub use winner_locator::{PositionLocator, WinnerLocator};
