//! Products and the surfaces and features that belong to them.

pub mod access;
mod create;
mod delete;
mod features;
mod list;
mod show;
mod surfaces;
pub mod types;
mod update;

use axum::Router;

use crate::app::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(list::routes())
        .merge(create::routes())
        .merge(show::routes())
        .merge(update::routes())
        .merge(delete::routes())
        .merge(surfaces::routes())
        .merge(features::routes())
}
