use axum::{extract::State, routing::get, Json, Router};

use crate::app::{
    error::AppError,
    session::CurrentUser,
    tenant::{self, OrganizationInfo},
    AppState,
};

/// GET /api/organizations — Organizations the caller belongs to; `[]` when anonymous.
pub async fn list(
    current: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationInfo>>, AppError> {
    let result = tenant::user_organizations(&state.db, current.user()).await?;
    Ok(Json(result.organizations))
}

/// GET /api/organizations/exists — Whether the caller belongs to any organization.
/// Anonymous callers get `false`, never an error.
pub async fn exists(
    current: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<bool>, AppError> {
    let has_orgs = tenant::has_user_organizations(&state.db, current.user()).await?;

    if let Some(user) = current.user() {
        tracing::debug!(user_id = %user.id, has_orgs, "checked user organizations");
    }

    Ok(Json(has_orgs))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations", get(list))
        .route("/api/organizations/exists", get(exists))
}
