mod activate;
mod create;
mod invitations;
mod list;
mod members;
mod show;
pub mod types;

use axum::Router;

use crate::app::AppState;

pub use invitations::INVITATION_TTL_MILLIS;

/// Organization routes: listing, creation, switching, membership and invitations.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(list::routes())
        .merge(create::routes())
        .merge(show::routes())
        .merge(activate::routes())
        .merge(members::routes())
        .merge(invitations::routes())
}
