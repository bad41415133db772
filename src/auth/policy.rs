//! Ownership policy: a resource may only be touched by the user who owns it.
//! There is no admin override and no sharing.

use crate::{auth::repo_types::User, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// `Deny` becomes `Forbidden`: the actor is known, just not entitled.
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AppError::Forbidden),
        }
    }
}

pub fn authorize(actor: &User, resource_owner_id: &str) -> Decision {
    if actor.id == resource_owner_id {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
