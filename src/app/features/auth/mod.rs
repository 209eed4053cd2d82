pub mod service;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod types;

use axum::Router;

use crate::app::AppState;

/// Authentication routes under /api/auth.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(sign_up::routes())
        .merge(sign_in::routes())
        .merge(sign_out::routes())
        .merge(session::routes())
}
