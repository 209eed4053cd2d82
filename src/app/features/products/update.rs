use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::patch,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::{
    access,
    types::{EntityPath, UpdateProductRequest},
};
use crate::app::{db, error::AppError, session::CurrentUser, AppState};

/// PATCH /api/organizations/:org_id/products/:id — Partial update.
pub async fn update_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProductRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    // Merge provided fields with existing values
    let description = match request.description {
        Some(value) => value,
        None => product.description.clone(),
    };
    let owners = request.owners.unwrap_or_else(|| product.owners.0.clone());

    let changes = db::products::ProductChanges {
        name: request.name.as_deref().unwrap_or(&product.name),
        description: description.as_deref(),
        criticality: request.criticality.unwrap_or(product.criticality),
        owners: &owners,
    };
    db::products::update(&state.db, &product.id, &changes).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations/:org_id/products/:id", patch(update_product))
}
