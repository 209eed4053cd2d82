pub mod features;
pub mod invitations;
pub mod organizations;
pub mod products;
pub mod sessions;
pub mod surfaces;
pub mod users;

pub use users::{find_by_email, NewUser, User};

use time::OffsetDateTime;

/// Current time as unix milliseconds, the resolution every timestamp column uses.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
