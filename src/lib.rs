pub mod config;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod prompts;
pub mod routes;
pub mod services;
pub mod utils;

use sea_orm::DatabaseConnection;

use crate::services::fal::FalClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub fal: FalClient,
}
