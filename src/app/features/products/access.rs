//! Entity access checks for products and their children.
//!
//! Every function runs the tenancy guard first, then compares the row's own
//! `organization_id` with the organization in the request. A row from another
//! organization is reported exactly like a missing one.

use sqlx::SqlitePool;

use crate::app::{
    db::{self, features::Feature, products::Product, surfaces::Surface},
    error::AppError,
    tenant,
};

/// The product, if it exists inside `organization_id` and the caller is a member there.
pub async fn product_with_access(
    pool: &SqlitePool,
    user: Option<&db::User>,
    product_id: &str,
    organization_id: &str,
) -> Result<Option<Product>, AppError> {
    tenant::require_org_access(pool, user, organization_id).await?;

    let product = db::products::find_by_id(pool, product_id)
        .await?
        .filter(|product| product.organization_id == organization_id);
    Ok(product)
}

/// Like [`product_with_access`], with a missing product as `NotFound`.
pub async fn require_product_access(
    pool: &SqlitePool,
    user: Option<&db::User>,
    product_id: &str,
    organization_id: &str,
) -> Result<Product, AppError> {
    product_with_access(pool, user, product_id, organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

pub async fn require_surface_access(
    pool: &SqlitePool,
    user: Option<&db::User>,
    surface_id: &str,
    organization_id: &str,
) -> Result<Surface, AppError> {
    tenant::require_org_access(pool, user, organization_id).await?;

    db::surfaces::find_by_id(pool, surface_id)
        .await?
        .filter(|surface| surface.organization_id == organization_id)
        .ok_or_else(|| AppError::NotFound("Surface not found".to_string()))
}

pub async fn require_feature_access(
    pool: &SqlitePool,
    user: Option<&db::User>,
    feature_id: &str,
    organization_id: &str,
) -> Result<Feature, AppError> {
    tenant::require_org_access(pool, user, organization_id).await?;

    db::features::find_by_id(pool, feature_id)
        .await?
        .filter(|feature| feature.organization_id == organization_id)
        .ok_or_else(|| AppError::NotFound("Feature not found".to_string()))
}

/// Delete a product with all of its surfaces and features in one transaction.
pub async fn remove_product(
    pool: &SqlitePool,
    user: Option<&db::User>,
    product_id: &str,
    organization_id: &str,
) -> Result<(), AppError> {
    let product = require_product_access(pool, user, product_id, organization_id).await?;

    let mut tx = pool.begin().await?;
    let surfaces = db::surfaces::delete_by_product(&mut *tx, &product.id).await?;
    let features = db::features::delete_by_product(&mut *tx, &product.id).await?;
    db::products::delete(&mut *tx, &product.id).await?;
    tx.commit().await?;

    tracing::info!(
        product_id = %product.id,
        organization_id = %product.organization_id,
        surfaces,
        features,
        "product deleted"
    );

    Ok(())
}
