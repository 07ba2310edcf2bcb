//! Local record keys owned by the gallery runtime.

/// Record holding the registered identity list (JSON array).
pub const IDENTITIES_KEY: &str = "photofeed.users.v1";
/// Record holding the current session projection (JSON object, absent when signed out).
pub const SESSION_KEY: &str = "photofeed.session.v1";
