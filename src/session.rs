//! Acting-user resolution.
//!
//! The host owns authentication; repositories only need "who is the current
//! user". Hosts implement [`Session`] over whatever request context they
//! carry.

use crate::entry::UserId;

/// Resolves the acting user for "current user" queries.
pub trait Session: Send + Sync {
    /// The acting user's id, or `None` when no user is signed in.
    fn current_user_id(&self) -> Option<UserId>;
}

/// A session with a fixed user, for tests and background jobs acting on a
/// known account.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSession(pub Option<UserId>);

impl FixedSession {
    #[must_use]
    pub fn user(user_id: UserId) -> Self {
        Self(Some(user_id))
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl Session for FixedSession {
    fn current_user_id(&self) -> Option<UserId> {
        self.0
    }
}
