use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, SqliteExecutor};

use crate::app::domain::SurfaceType;

/// Per-environment URLs of a surface. Absent environments are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod: Option<String>,
}

/// Database row for surfaces table.
#[derive(Debug, Clone, FromRow)]
pub struct Surface {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub name: String,
    #[sqlx(rename = "type")]
    pub surface_type: SurfaceType,
    pub location: Option<String>,
    pub environments: Json<Environments>,
    pub external_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new surface.
/// `organization_id` must be the parent product's.
pub struct NewSurface {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub name: String,
    pub surface_type: SurfaceType,
    pub location: Option<String>,
    pub environments: Environments,
    pub external_id: Option<String>,
}

/// Mutable surface fields, written back in full after the caller merges a patch.
/// Parent and organization are fixed at creation.
pub struct SurfaceChanges<'a> {
    pub name: &'a str,
    pub surface_type: SurfaceType,
    pub location: Option<&'a str>,
    pub environments: &'a Environments,
    pub external_id: Option<&'a str>,
}

const COLUMNS: &str = "id, product_id, organization_id, name, type, location, environments, external_id, created_at, updated_at";

/// Insert a new surface.
pub async fn insert<'e, E>(
    executor: E,
    surface: &NewSurface,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = super::now_millis();

    sqlx::query(
        "INSERT INTO surfaces (id, product_id, organization_id, name, type, location, environments, external_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&surface.id)
    .bind(&surface.product_id)
    .bind(&surface.organization_id)
    .bind(&surface.name)
    .bind(surface.surface_type)
    .bind(&surface.location)
    .bind(Json(&surface.environments))
    .bind(&surface.external_id)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find a surface by ID, in any organization.
pub async fn find_by_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Surface>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Surface>(&format!("SELECT {COLUMNS} FROM surfaces WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Surfaces of a product, oldest first.
pub async fn list_by_product<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<Vec<Surface>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Surface>(&format!(
        "SELECT {COLUMNS} FROM surfaces WHERE product_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(product_id)
    .fetch_all(executor)
    .await
}

/// Overwrite the mutable fields and bump `updated_at`.
pub async fn update<'e, E>(
    executor: E,
    id: &str,
    changes: &SurfaceChanges<'_>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE surfaces SET name = ?, type = ?, location = ?, environments = ?, external_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(changes.name)
    .bind(changes.surface_type)
    .bind(changes.location)
    .bind(Json(changes.environments))
    .bind(changes.external_id)
    .bind(super::now_millis())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete a single surface.
pub async fn delete<'e, E>(
    executor: E,
    id: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM surfaces WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete every surface of a product. Returns how many were removed.
pub async fn delete_by_product<'e, E>(
    executor: E,
    product_id: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM surfaces WHERE product_id = ?")
        .bind(product_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
