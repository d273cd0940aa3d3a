use std::sync::{Arc, RwLock};

use course_core::model::Credential;

/// Holds the current authentication credential for the life of the session.
///
/// Explicitly passed to whoever needs it instead of living in ambient global
/// storage. Cheap to clone; clones share the same slot. No network calls of
/// its own: the auth service writes it, the progress tracker clears it when
/// the server rejects it.
#[derive(Clone, Default)]
pub struct SessionContext {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that already holds a credential, for tests and tools.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        let session = Self::new();
        session.set(credential);
        session
    }

    /// Snapshot of the current credential, if one is held.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().expect("session lock").clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.read().expect("session lock").is_some()
    }

    pub fn set(&self, credential: Credential) {
        *self.credential.write().expect("session lock") = Some(credential);
    }

    /// Discard the held credential, forcing re-authentication.
    pub fn clear(&self) {
        *self.credential.write().expect("session lock") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_slot() {
        let session = SessionContext::new();
        let view = session.clone();
        assert!(!view.is_authenticated());

        session.set(Credential::new("tok"));
        assert!(view.is_authenticated());
        assert_eq!(view.credential().unwrap().expose(), "tok");

        view.clear();
        assert!(!session.is_authenticated());
    }
}
