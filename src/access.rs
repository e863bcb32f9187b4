//! Access gating.
//!
//! Authentication itself happens elsewhere; the caller hands over a
//! [`Principal`] describing who is asking.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("login required")]
    Unauthenticated,
    #[error("administrator access required")]
    Forbidden,
}

/// The requesting user, as established by the authentication layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Principal {
    pub authenticated: bool,
    pub admin: bool,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user() -> Self {
        Self {
            authenticated: true,
            admin: false,
        }
    }

    pub fn admin() -> Self {
        Self {
            authenticated: true,
            admin: true,
        }
    }

    pub fn require_authenticated(&self) -> Result<(), AccessError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AccessError::Unauthenticated)
        }
    }

    /// Admin operations need a logged-in administrator.
    pub fn require_admin(&self) -> Result<(), AccessError> {
        self.require_authenticated()?;
        if self.admin {
            Ok(())
        } else {
            Err(AccessError::Forbidden)
        }
    }
}
