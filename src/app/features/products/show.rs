use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::{
    access,
    types::{EntityPath, FeatureResponse, ProductResponse, ProductWithRelations, SurfaceResponse},
};
use crate::app::{db, error::AppError, session::CurrentUser, AppState};

/// GET /api/organizations/:org_id/products/:id
pub async fn get_product(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = access::product_with_access(&state.db, current.user(), &path.id, &path.org_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product.into()))
}

/// GET /api/organizations/:org_id/products/:id/relations — Product with its surfaces and features.
pub async fn get_product_with_relations(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<Json<ProductWithRelations>, AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;

    let surfaces = db::surfaces::list_by_product(&state.db, &product.id).await?;
    let features = db::features::list_by_product(&state.db, &product.id).await?;

    Ok(Json(ProductWithRelations {
        product: product.into(),
        surfaces: surfaces.into_iter().map(SurfaceResponse::from).collect(),
        features: features.into_iter().map(FeatureResponse::from).collect(),
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations/:org_id/products/:id", get(get_product))
        .route(
            "/api/organizations/:org_id/products/:id/relations",
            get(get_product_with_relations),
        )
}
