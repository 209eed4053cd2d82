use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How critical a product is to the organization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
}
