//! Capability-based authorization.
//!
//! Every privileged mutation consults a [`CapabilityGate`] before touching
//! state. A capability is the triple (grantee, target, action); anything not
//! explicitly granted is denied.

pub mod capability;
pub mod error;
pub mod registry;

pub use capability::{Capability, CapabilityGate};
pub use error::AuthError;
pub use registry::CapabilityRegistry;
