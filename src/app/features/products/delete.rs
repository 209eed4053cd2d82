use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
    Router,
};

use super::{access, types::EntityPath};
use crate::app::{error::AppError, session::CurrentUser, AppState};

/// DELETE /api/organizations/:org_id/products/:id — Delete a product with its surfaces and features.
pub async fn delete_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<StatusCode, AppError> {
    access::remove_product(&state.db, current.user(), &path.id, &path.org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/products/:id", delete(delete_product))
}
