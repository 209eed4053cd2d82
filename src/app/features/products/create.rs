use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::types::{CreateProductRequest, CreatedResponse, OrgPath};
use crate::app::{db, error::AppError, session::CurrentUser, tenant, AppState};

/// POST /api/organizations/:org_id/products — Create a product.
pub async fn create_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<OrgPath>,
    WithRejection(Json(request), _): WithRejection<Json<CreateProductRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    tenant::require_org_access(&state.db, current.user(), &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    let product = db::products::NewProduct {
        id: ulid::Ulid::new().to_string(),
        organization_id: path.org_id,
        name: request.name,
        description: request.description,
        criticality: request.criticality,
        owners: request.owners,
    };
    db::products::insert(&state.db, &product).await?;

    tracing::debug!(product_id = %product.id, organization_id = %product.organization_id, "product created");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: product.id })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/products", post(create_product))
}
