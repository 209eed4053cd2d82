use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::{
    access,
    types::{CreateFeatureRequest, CreatedResponse, EntityPath, FeatureResponse, UpdateFeatureRequest},
};
use crate::app::{db, error::AppError, session::CurrentUser, AppState};

/// GET /api/organizations/:org_id/products/:id/features
pub async fn list_features(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<Json<Vec<FeatureResponse>>, AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;

    let features = db::features::list_by_product(&state.db, &product.id)
        .await?
        .into_iter()
        .map(FeatureResponse::from)
        .collect();

    Ok(Json(features))
}

/// POST /api/organizations/:org_id/products/:id/features
pub async fn create_feature(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    WithRejection(Json(request), _): WithRejection<Json<CreateFeatureRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    let feature = db::features::NewFeature {
        id: ulid::Ulid::new().to_string(),
        product_id: product.id,
        organization_id: product.organization_id,
        title: request.title,
        description: request.description,
        acceptance_criteria: request.acceptance_criteria,
        source: request.source,
        source_key: request.source_key,
        status: request.status,
    };
    db::features::insert(&state.db, &feature).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: feature.id })))
}

/// PATCH /api/organizations/:org_id/features/:id
pub async fn update_feature(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateFeatureRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let feature =
        access::require_feature_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    let description = request.description.unwrap_or_else(|| feature.description.clone());
    let source_key = request.source_key.unwrap_or_else(|| feature.source_key.clone());
    let acceptance_criteria = request
        .acceptance_criteria
        .unwrap_or_else(|| feature.acceptance_criteria.0.clone());

    let changes = db::features::FeatureChanges {
        title: request.title.as_deref().unwrap_or(&feature.title),
        description: description.as_deref(),
        acceptance_criteria: &acceptance_criteria,
        source: request.source.unwrap_or(feature.source),
        source_key: source_key.as_deref(),
        status: request.status.unwrap_or(feature.status),
    };
    db::features::update(&state.db, &feature.id, &changes).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/organizations/:org_id/features/:id
pub async fn delete_feature(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<StatusCode, AppError> {
    let feature =
        access::require_feature_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    db::features::delete(&state.db, &feature.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/organizations/:org_id/products/:id/features",
            get(list_features).post(create_feature),
        )
        .route(
            "/api/organizations/:org_id/features/:id",
            patch(update_feature).delete(delete_feature),
        )
}
