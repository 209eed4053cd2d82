use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Progress of a tracked feature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum FeatureStatus {
    #[default]
    Draft,
    Ready,
    InProgress,
    Completed,
}

/// Where a feature was first recorded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FeatureSource {
    #[default]
    Manual,
    Jira,
}
