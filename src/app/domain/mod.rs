pub mod criticality;
pub mod email;
pub mod feature_status;
pub mod invitation_status;
pub mod organization_id;
pub mod organization_role;
pub mod organization_slug;
pub mod password;
pub mod surface_type;
pub mod user_id;

pub use criticality::Criticality;
pub use email::Email;
pub use feature_status::{FeatureSource, FeatureStatus};
pub use invitation_status::InvitationStatus;
pub use organization_id::OrganizationId;
pub use organization_role::OrganizationRole;
pub use organization_slug::OrganizationSlug;
pub use password::{HashedPassword, Password};
pub use surface_type::SurfaceType;
pub use user_id::UserId;
