pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod resolver;
pub mod server;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
