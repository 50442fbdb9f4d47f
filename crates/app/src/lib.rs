//! HTTP front end of the RCCM quiz server.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use routes::create_router;
pub use state::{AppState, spawn_session_purge};
