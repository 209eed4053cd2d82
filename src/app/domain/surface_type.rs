use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Kind of deployable unit a surface represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SurfaceType {
    Repo,
    Service,
    Webapp,
    Worker,
    Infra,
}
