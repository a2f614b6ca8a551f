//! Registry of explicit capability grants.

use crate::{AuthError, Capability, CapabilityGate};
use agora_types::{ActionName, Principal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Stores one permitted flag per (grantee, target, action).
///
/// Later writes to the same key overwrite earlier ones. Grants never expire.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CapabilityRegistry {
    grants: BTreeMap<Capability, bool>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `grantee` may perform `action` on `target`.
    ///
    /// Who may call `grant` is decided by the surrounding system; the
    /// registry accepts every grantor.
    pub fn grant(
        &mut self,
        grantor: &Principal,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
    ) -> Result<bool, AuthError> {
        self.set(grantor, grantee, target, action, true);
        Ok(true)
    }

    /// Record that `grantee` may no longer perform `action` on `target`.
    pub fn revoke(
        &mut self,
        grantor: &Principal,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
    ) -> Result<bool, AuthError> {
        self.set(grantor, grantee, target, action, false);
        Ok(true)
    }

    fn set(
        &mut self,
        grantor: &Principal,
        grantee: &Principal,
        target: &Principal,
        action: &ActionName,
        permitted: bool,
    ) {
        let capability = Capability::new(grantee.clone(), target.clone(), action.clone());
        debug!(%grantor, %capability, permitted, "capability written");
        self.grants.insert(capability, permitted);
    }

    /// Every stored grant with its permitted flag, in key order.
    pub fn grants(&self) -> impl Iterator<Item = (&Capability, bool)> {
        self.grants.iter().map(|(c, p)| (c, *p))
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl CapabilityGate for CapabilityRegistry {
    fn can_call(&self, grantee: &Principal, target: &Principal, action: &ActionName) -> bool {
        let key = Capability::new(grantee.clone(), target.clone(), action.clone());
        self.grants.get(&key).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(name: &str) -> Principal {
        Principal::new(name)
    }

    fn action(name: &str) -> ActionName {
        ActionName::new(name)
    }

    #[test]
    fn unknown_capability_is_denied() {
        let registry = CapabilityRegistry::new();
        assert!(!registry.can_call(&principal("wallet_3"), &principal("deployer.auth"), &action("bla-bla-bla")));
    }

    #[test]
    fn grant_succeeds_and_allows_the_exact_triple() {
        let mut registry = CapabilityRegistry::new();
        let who = principal("wallet_3");
        let target = principal("deployer.auth");
        let what = action("bla-bla-bla");

        assert_eq!(registry.grant(&principal("deployer"), &who, &target, &what), Ok(true));
        assert!(registry.can_call(&who, &target, &what));

        assert!(!registry.can_call(&principal("wallet_4"), &target, &what));
        assert!(!registry.can_call(&who, &principal("deployer.voting"), &what));
        assert!(!registry.can_call(&who, &target, &action("other")));
    }

    #[test]
    fn later_writes_overwrite_earlier_ones() {
        let mut registry = CapabilityRegistry::new();
        let deployer = principal("deployer");
        let who = principal("wallet_1");
        let target = principal("deployer.voting");
        let what = action("new-vote");

        registry.grant(&deployer, &who, &target, &what).unwrap();
        registry.revoke(&deployer, &who, &target, &what).unwrap();
        assert!(!registry.can_call(&who, &target, &what));
        assert_eq!(registry.len(), 1);

        registry.grant(&deployer, &who, &target, &what).unwrap();
        assert!(registry.can_call(&who, &target, &what));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_maps_denial_to_not_authorized() {
        let registry = CapabilityRegistry::new();
        let err = registry
            .require(&principal("wallet_2"), &principal("deployer.voting"), &action("new-vote"))
            .unwrap_err();
        assert!(matches!(err, AuthError::NotAuthorized { .. }));
    }

    #[test]
    fn registry_survives_bincode_roundtrip() {
        let mut registry = CapabilityRegistry::new();
        let who = principal("wallet_1");
        let target = principal("deployer.token");
        registry.grant(&principal("deployer"), &who, &target, &action("mint")).unwrap();

        let bytes = bincode::serialize(&registry).unwrap();
        let restored: CapabilityRegistry = bincode::deserialize(&bytes).unwrap();
        assert!(restored.can_call(&who, &target, &action("mint")));
        assert_eq!(restored.grants().count(), 1);
    }
}
