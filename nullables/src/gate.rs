//! Nullable capability gate: fixed answers for testing.

use agora_auth::{Capability, CapabilityGate};
use agora_types::{ActionName, Principal};
use std::collections::HashSet;

/// A gate that allows everything, nothing, or an explicit set of capabilities.
#[derive(Clone, Debug, Default)]
pub struct NullGate {
    allow_all: bool,
    allowed: HashSet<Capability>,
}

impl NullGate {
    /// Allows every call.
    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            allowed: HashSet::new(),
        }
    }

    /// Denies every call.
    pub fn deny_all() -> Self {
        Self::default()
    }

    /// Allow one more capability.
    pub fn with(mut self, grantee: &Principal, target: &Principal, action: &ActionName) -> Self {
        self.allowed
            .insert(Capability::new(grantee.clone(), target.clone(), action.clone()));
        self
    }
}

impl CapabilityGate for NullGate {
    fn can_call(&self, grantee: &Principal, target: &Principal, action: &ActionName) -> bool {
        self.allow_all
            || self
                .allowed
                .contains(&Capability::new(grantee.clone(), target.clone(), action.clone()))
    }
}
