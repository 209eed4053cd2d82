use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name, used in log lines and outgoing mail.
pub const APP_NAME: &str = "Prodtrack";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub mail: Arc<dyn mail::EmailSender>,
    pub config: config::Config,
}

/// All API routes. Merged into the top-level router in `lib.rs`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(features::auth::routes())
        .merge(features::organizations::routes())
        .merge(features::products::routes())
}

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod identity;
pub mod mail;
pub mod session;
pub mod single_writer;
pub mod tenant;
