use sqlx::{types::Json, FromRow, SqliteExecutor};

use crate::app::domain::Criticality;

/// Database row for products table.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub criticality: Criticality,
    pub owners: Json<Vec<String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new product.
pub struct NewProduct {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub criticality: Criticality,
    pub owners: Vec<String>,
}

/// Mutable product fields, written back in full after the caller merges a patch.
pub struct ProductChanges<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub criticality: Criticality,
    pub owners: &'a [String],
}

const COLUMNS: &str =
    "id, organization_id, name, description, criticality, owners, created_at, updated_at";

/// Insert a new product. `created_at` and `updated_at` start equal.
pub async fn insert<'e, E>(
    executor: E,
    product: &NewProduct,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = super::now_millis();

    sqlx::query(
        "INSERT INTO products (id, organization_id, name, description, criticality, owners, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.id)
    .bind(&product.organization_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.criticality)
    .bind(Json(&product.owners))
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Find a product by ID, in any organization. Callers compare `organization_id` themselves.
pub async fn find_by_id<'e, E>(
    executor: E,
    id: &str,
) -> Result<Option<Product>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Product>(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// All products of an organization, oldest first.
pub async fn list_by_organization<'e, E>(
    executor: E,
    organization_id: &str,
) -> Result<Vec<Product>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} FROM products WHERE organization_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(organization_id)
    .fetch_all(executor)
    .await
}

/// Overwrite the mutable fields and bump `updated_at`.
pub async fn update<'e, E>(
    executor: E,
    id: &str,
    changes: &ProductChanges<'_>,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE products SET name = ?, description = ?, criticality = ?, owners = ?, updated_at = ? WHERE id = ?",
    )
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.criticality)
    .bind(Json(changes.owners))
    .bind(super::now_millis())
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete a product row. Children must already be gone.
pub async fn delete<'e, E>(
    executor: E,
    id: &str,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
