//! Roulette HTTP API
//!
//! JSON endpoints for creating, spinning and settling tables and placing bets.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::{ApiServer, ServerError};
