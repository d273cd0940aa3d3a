use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ─── CREDENTIAL ────────────────────────────────────────────────────────────────
//

/// Opaque bearer token identifying an authenticated learner.
///
/// The client never inspects its contents; only presence/absence and
/// server-reported validity matter. `Debug` redacts the token so it cannot
/// leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the transport layer's auth header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

//
// ─── USER PROFILE ──────────────────────────────────────────────────────────────
//

/// The signed-in learner's account data, as served by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// "First Last", falling back to the username when names are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Whole days since the account was created, at least 1.
    /// `None` when the server did not report a join date.
    #[must_use]
    pub fn days_on_platform(&self, now: DateTime<Utc>) -> Option<i64> {
        let joined = self.date_joined?;
        let days = (now - joined).num_days();
        Some(days.max(1))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::time::fixed_now;

    fn user(first: &str, last: &str) -> UserProfile {
        UserProfile {
            username: "grace".into(),
            email: "grace@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
            about: None,
            date_joined: Some(fixed_now() - Duration::days(10)),
        }
    }

    #[test]
    fn debug_redacts_the_token() {
        let credential = Credential::new("super-secret");
        let printed = format!("{credential:?}");
        assert!(!printed.contains("super-secret"));
        assert_eq!(printed, "Credential(***)");
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(user("Grace", "Hopper").display_name(), "Grace Hopper");
        assert_eq!(user("", "").display_name(), "grace");
    }

    #[test]
    fn days_on_platform_counts_whole_days() {
        assert_eq!(user("G", "H").days_on_platform(fixed_now()), Some(10));
    }

    #[test]
    fn days_on_platform_is_at_least_one() {
        let mut fresh = user("G", "H");
        fresh.date_joined = Some(fixed_now());
        assert_eq!(fresh.days_on_platform(fixed_now()), Some(1));

        fresh.date_joined = None;
        assert_eq!(fresh.days_on_platform(fixed_now()), None);
    }
}
