//! Explicitly-scoped authentication context.
//!
//! The session is a shared handle constructed at startup and handed to the
//! layers that need the current identity. Sign-in installs an identity,
//! sign-out clears it; there is no process-global auth state anywhere.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use keel_core::OwnerId;

/// An authenticated principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Owner id every record of this principal is scoped to.
    pub owner: OwnerId,
    /// Display email, when the auth provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    /// Identity with no display email.
    pub fn new(owner: impl Into<OwnerId>) -> Self {
        Self {
            owner: owner.into(),
            email: None,
        }
    }

    /// Attach a display email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Shared session handle.
///
/// Cloning shares the handle: a sign-out through any clone is visible to
/// every holder. Commands re-read the identity at dispatch time, so a
/// sign-out racing an in-flight UI action fails that action with
/// `Unauthenticated` instead of writing under a stale identity.
#[derive(Clone, Debug, Default)]
pub struct Session {
    identity: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    /// Session with nobody signed in.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Session pre-populated with an identity.
    #[must_use]
    pub fn signed_in(identity: Identity) -> Self {
        let session = Self::default();
        session.sign_in(identity);
        session
    }

    /// Install an identity after successful authentication.
    pub fn sign_in(&self, identity: Identity) {
        info!(owner = %identity.owner, "session signed in");
        *self.identity.write() = Some(identity);
    }

    /// Clear the identity. Idempotent.
    pub fn sign_out(&self) {
        if let Some(identity) = self.identity.write().take() {
            info!(owner = %identity.owner, "session signed out");
        }
    }

    /// Current identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    /// Owner id of the current identity.
    #[must_use]
    pub fn owner(&self) -> Option<OwnerId> {
        self.identity.read().as_ref().map(|i| i.owner.clone())
    }

    /// Whether an identity is present.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.identity.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_then_out_round_trips() {
        let session = Session::signed_out();
        assert!(!session.is_signed_in());
        assert_eq!(session.owner(), None);

        session.sign_in(Identity::new("user-1").with_email("u@example.com"));
        assert!(session.is_signed_in());
        assert_eq!(session.owner(), Some(OwnerId::from("user-1")));
        assert_eq!(
            session.identity().unwrap().email.as_deref(),
            Some("u@example.com")
        );

        session.sign_out();
        assert!(!session.is_signed_in());
        // Idempotent.
        session.sign_out();
    }

    #[test]
    fn clones_share_the_handle() {
        let session = Session::signed_in(Identity::new("user-1"));
        let held_by_commands = session.clone();

        session.sign_out();
        assert!(!held_by_commands.is_signed_in());
    }
}
