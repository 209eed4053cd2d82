use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role a user holds within an organization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrganizationRole {
    Owner,
    Admin,
    Member,
}

impl OrganizationRole {
    /// Owners and admins may invite, cancel invitations and remove members.
    pub fn can_manage_members(self) -> bool {
        matches!(self, OrganizationRole::Owner | OrganizationRole::Admin)
    }
}
