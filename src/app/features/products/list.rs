use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::types::{OrgPath, ProductResponse};
use crate::app::{db, error::AppError, session::CurrentUser, tenant, AppState};

/// GET /api/organizations/:org_id/products — All products of the organization.
pub async fn list_products(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    tenant::require_org_access(&state.db, current.user(), &path.org_id).await?;

    let products = db::products::list_by_organization(&state.db, &path.org_id)
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(Json(products))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/products", get(list_products))
}
