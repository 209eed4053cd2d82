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
    types::{CreateSurfaceRequest, CreatedResponse, EntityPath, SurfaceResponse, UpdateSurfaceRequest},
};
use crate::app::{db, error::AppError, session::CurrentUser, AppState};

/// GET /api/organizations/:org_id/products/:id/surfaces
pub async fn list_surfaces(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<Json<Vec<SurfaceResponse>>, AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;

    let surfaces = db::surfaces::list_by_product(&state.db, &product.id)
        .await?
        .into_iter()
        .map(SurfaceResponse::from)
        .collect();

    Ok(Json(surfaces))
}

/// POST /api/organizations/:org_id/products/:id/surfaces
pub async fn create_surface(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    WithRejection(Json(request), _): WithRejection<Json<CreateSurfaceRequest>, AppError>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let product =
        access::require_product_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    // Children always inherit the product's organization.
    let surface = db::surfaces::NewSurface {
        id: ulid::Ulid::new().to_string(),
        product_id: product.id,
        organization_id: product.organization_id,
        name: request.name,
        surface_type: request.surface_type,
        location: request.location,
        environments: request.environments,
        external_id: request.external_id,
    };
    db::surfaces::insert(&state.db, &surface).await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: surface.id })))
}

/// PATCH /api/organizations/:org_id/surfaces/:id
pub async fn update_surface(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateSurfaceRequest>, AppError>,
) -> Result<StatusCode, AppError> {
    let surface =
        access::require_surface_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    request.validate().map_err(AppError::from_validation)?;

    let location = request.location.unwrap_or_else(|| surface.location.clone());
    let external_id = request.external_id.unwrap_or_else(|| surface.external_id.clone());
    let environments = request
        .environments
        .unwrap_or_else(|| surface.environments.0.clone());

    let changes = db::surfaces::SurfaceChanges {
        name: request.name.as_deref().unwrap_or(&surface.name),
        surface_type: request.surface_type.unwrap_or(surface.surface_type),
        location: location.as_deref(),
        environments: &environments,
        external_id: external_id.as_deref(),
    };
    db::surfaces::update(&state.db, &surface.id, &changes).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/organizations/:org_id/surfaces/:id
pub async fn delete_surface(
    current: CurrentUser,
    State(state): State<AppState>,
    Path(path): Path<EntityPath>,
) -> Result<StatusCode, AppError> {
    let surface =
        access::require_surface_access(&state.db, current.user(), &path.id, &path.org_id).await?;
    db::surfaces::delete(&state.db, &surface.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/organizations/:org_id/products/:id/surfaces",
            get(list_surfaces).post(create_surface),
        )
        .route(
            "/api/organizations/:org_id/surfaces/:id",
            patch(update_surface).delete(delete_surface),
        )
}
