//! Role and permission evaluation for the HR + CRM surfaces.

pub mod current;
pub mod error;
pub mod evaluator;
pub mod permission;
pub mod principal;
pub mod role;

pub use error::{AuthzError, AuthzResult};
pub use evaluator::AccessEvaluator;
pub use permission::{AnyOf, Grant, Permission, WILDCARD};
pub use principal::{OwnedResource, Principal, PrincipalId, RawPrincipal, RawRole};
pub use role::{Capability, LegacyRole, Role, StaticGrant};
