//! The capability triple and the gate trait consulted by gated operations.

use crate::AuthError;
use agora_types::{ActionName, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission for `grantee` to perform `action` on `target`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub grantee: Principal,
    pub target: Principal,
    pub action: ActionName,
}

impl Capability {
    pub fn new(grantee: Principal, target: Principal, action: ActionName) -> Self {
        Self {
            grantee,
            target,
            action,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.grantee, self.target, self.action)
    }
}

/// Point-in-time permission check.
pub trait CapabilityGate {
    /// Whether `grantee` may perform `action` on `target`. Deny by default.
    fn can_call(&self, grantee: &Principal, target: &Principal, action: &ActionName) -> bool;

    /// Like [`CapabilityGate::can_call`], mapping a denial to an error.
    fn require(
        &self,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
    ) -> Result<(), AuthError> {
        if self.can_call(grantee, target, action) {
            Ok(())
        } else {
            Err(AuthError::NotAuthorized {
                grantee: grantee.clone(),
                target: target.clone(),
                action: action.clone(),
            })
        }
    }
}

impl<T: CapabilityGate + ?Sized> CapabilityGate for &T {
    fn can_call(&self, grantee: &Principal, target: &Principal, action: &ActionName) -> bool {
        (**self).can_call(grantee, target, action)
    }
}
