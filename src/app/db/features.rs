use sqlx::{types::Json, FromRow, SqliteExecutor};

use crate::app::domain::{FeatureSource, FeatureStatus};

/// Database row for features table.
#[derive(Debug, Clone, FromRow)]
pub struct Feature {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub title: String,
    pub description: Option<String>,
    pub acceptance_criteria: Json<Vec<String>>,
    pub source: FeatureSource,
    pub source_key: Option<String>,
    pub status: FeatureStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new feature.
/// `organization_id` must be the parent product's.
pub struct NewFeature {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub title: String,
    pub description: Option<String>,
    pub acceptance_criteria: Vec<String>,
    pub source: FeatureSource,
    pub source_key: Option<String>,
    pub status: FeatureStatus,
}

/// Mutable feature fields, written back in full after the caller merges a patch.
pub struct FeatureChanges<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub acceptance_criteria: &'a [String],
    pub source: FeatureSource,
    pub source_key: Option<&'a str>,
    pub status: FeatureStatus,
}

const COLUMNS: &str = "id, product_id, organization_id, title, description, acceptance_criteria, source, source_key, status, created_at, updated_at";

/// Insert a new feature.
pub async fn insert<'e, E>(
    executor: E,
    feature: &NewFeature,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = super::now_millis();

    sqlx::query(
        "INSERT INTO features (id, product_id, organization_id, title, description, acceptance_criteria, source, source_key, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&feature.id)
    .bind(&feature.product_id)
    .bind(&feature.organization_id)
    .bind(&feature.title)
    .bind(&feature.description)
    .bind(Json(&feature.acceptance_criteria))
    .bind(feature.source)
    .bind(&feature.source_key)
    .bind(feature.status)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find a feature by ID, in any organization.
pub async fn find_by_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Feature>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Feature>(&format!("SELECT {COLUMNS} FROM features WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Features of a product, oldest first.
pub async fn list_by_product<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<Vec<Feature>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Feature>(&format!(
        "SELECT {COLUMNS} FROM features WHERE product_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(product_id)
    .fetch_all(executor)
    .await
}

/// Overwrite the mutable fields and bump `updated_at`.
pub async fn update<'e, E>(
    executor: E,
    id: &str,
    changes: &FeatureChanges<'_>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE features SET title = ?, description = ?, acceptance_criteria = ?, source = ?, source_key = ?, status = ?, updated_at = ? WHERE id = ?",
    )
    .bind(changes.title)
    .bind(changes.description)
    .bind(Json(changes.acceptance_criteria))
    .bind(changes.source)
    .bind(changes.source_key)
    .bind(changes.status)
    .bind(super::now_millis())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete a single feature.
pub async fn delete<'e, E>(
    executor: E,
    id: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM features WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete every feature of a product. Returns how many were removed.
pub async fn delete_by_product<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM features WHERE product_id = ?")
        .bind(product_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
