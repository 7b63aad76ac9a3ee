//! Entity types for the four store collections

mod discussion;
mod neo;
mod profile;
mod watch;

pub use discussion::{CommunityDiscussion, ANONYMOUS_AUTHOR};
pub use neo::{NearEarthObject, RiskLevel};
pub use profile::UserProfile;
pub use watch::WatchedAsteroid;
