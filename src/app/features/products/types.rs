use serde::{de::Deserializer, Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    db::{
        features::Feature,
        products::Product,
        surfaces::{Environments, Surface},
    },
    domain::{Criticality, FeatureSource, FeatureStatus, SurfaceType},
};

/// Missing key => None, present null => Some(None), present value => Some(Some(v)).
/// Lets a patch tell "leave unchanged" apart from "clear".
fn deserialize_optional_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Path parameters for GET/POST /api/organizations/:org_id/products.
#[derive(Debug, Deserialize)]
pub struct OrgPath {
    pub org_id: String,
}

/// Path parameters for any route addressing one entity inside an organization.
#[derive(Debug, Deserialize)]
pub struct EntityPath {
    pub org_id: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub criticality: Criticality,
    #[serde(default)]
    pub owners: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    /// Omit = unchanged, null = clear.
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub description: Option<Option<String>>,
    pub criticality: Option<Criticality>,
    pub owners: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurfaceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub surface_type: SurfaceType,
    pub location: Option<String>,
    #[serde(default)]
    pub environments: Environments,
    pub external_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurfaceRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub surface_type: Option<SurfaceType>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub location: Option<Option<String>>,
    pub environments: Option<Environments>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub external_id: Option<Option<String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeatureRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub source: FeatureSource,
    pub source_key: Option<String>,
    #[serde(default)]
    pub status: FeatureStatus,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeatureRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub description: Option<Option<String>>,
    pub acceptance_criteria: Option<Vec<String>>,
    pub source: Option<FeatureSource>,
    #[serde(default, deserialize_with = "deserialize_optional_option")]
    pub source_key: Option<Option<String>>,
    pub status: Option<FeatureStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub description: Option<String>,
    pub criticality: Criticality,
    pub owners: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            organization_id: product.organization_id,
            name: product.name,
            description: product.description,
            criticality: product.criticality,
            owners: product.owners.0,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceResponse {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub surface_type: SurfaceType,
    pub location: Option<String>,
    pub environments: Environments,
    pub external_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Surface> for SurfaceResponse {
    fn from(surface: Surface) -> Self {
        Self {
            id: surface.id,
            product_id: surface.product_id,
            organization_id: surface.organization_id,
            name: surface.name,
            surface_type: surface.surface_type,
            location: surface.location,
            environments: surface.environments.0,
            external_id: surface.external_id,
            created_at: surface.created_at,
            updated_at: surface.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResponse {
    pub id: String,
    pub product_id: String,
    pub organization_id: String,
    pub title: String,
    pub description: Option<String>,
    pub acceptance_criteria: Vec<String>,
    pub source: FeatureSource,
    pub source_key: Option<String>,
    pub status: FeatureStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Feature> for FeatureResponse {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id,
            product_id: feature.product_id,
            organization_id: feature.organization_id,
            title: feature.title,
            description: feature.description,
            acceptance_criteria: feature.acceptance_criteria.0,
            source: feature.source,
            source_key: feature.source_key,
            status: feature.status,
            created_at: feature.created_at,
            updated_at: feature.updated_at,
        }
    }
}

/// A product together with everything hanging off it.
#[derive(Debug, Serialize)]
pub struct ProductWithRelations {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub surfaces: Vec<SurfaceResponse>,
    pub features: Vec<FeatureResponse>,
}
