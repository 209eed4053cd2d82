use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use validator::Validate;

use super::types::CreateOrganizationRequest;
use crate::app::{
    db,
    domain::{OrganizationId, OrganizationRole, OrganizationSlug},
    error::AppError,
    session::AuthenticatedSession,
    tenant::OrganizationInfo,
    AppState,
};

/// POST /api/organizations — Create an organization owned by the caller and make it active.
pub async fn create(
    AuthenticatedSession(identity): AuthenticatedSession,
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateOrganizationRequest>, AppError>,
) -> Result<(StatusCode, Json<OrganizationInfo>), AppError> {
    request.validate().map_err(AppError::from_validation)?;

    let slug = OrganizationSlug::parse(&request.slug).map_err(|e| {
        AppError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid slug".to_string()),
        )
    })?;

    let user = &identity.user;
    let owned = db::organizations::count_for_user(&state.db, &user.id).await?;
    if owned >= state.config.max_organizations_per_user {
        return Err(AppError::Validation(
            "You have reached the maximum number of organizations".to_string(),
        ));
    }

    if db::organizations::slug_taken(&state.db, &slug).await? {
        return Err(AppError::Conflict("Organization slug is already taken".to_string()));
    }

    let organization = db::organizations::NewOrganization {
        id: OrganizationId::new(),
        name: request.name.trim().to_string(),
        slug,
    };
    let organization_id = organization.id.as_str();

    let mut tx = state.db.begin().await?;
    db::organizations::insert(&mut *tx, &organization).await?;
    db::organizations::add_member(&mut *tx, &organization_id, &user.id, OrganizationRole::Owner).await?;
    db::sessions::set_active_organization(&mut *tx, &identity.session.id, Some(&organization_id)).await?;
    tx.commit().await?;

    tracing::info!(organization_id = %organization_id, user_id = %user.id, "organization created");

    Ok((
        StatusCode::CREATED,
        Json(OrganizationInfo {
            id: organization_id,
            name: organization.name,
            slug: organization.slug.as_str().to_string(),
        }),
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/organizations", post(create))
}
