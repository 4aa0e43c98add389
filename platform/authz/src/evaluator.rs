use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    current::with_principal,
    error::{AuthzError, AuthzResult},
    permission::{AnyOf, Grant},
    principal::{OwnedResource, Principal},
    role::LegacyRole,
};

const ADMIN_ROLES: [&str; 2] = [LegacyRole::SuperAdmin.as_str(), LegacyRole::Admin.as_str()];

/// Stateless access decisions over a principal.
///
/// Every operation accepts `None` for the principal, in which case the one
/// installed by [`crate::current::scope`] is consulted. With neither, the
/// answer is always "no access".
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessEvaluator;

impl AccessEvaluator {
    /// True if any of the listed permissions is granted.
    pub fn has_permission<Q: AnyOf + ?Sized>(
        &self,
        query: &Q,
        principal: Option<&Principal>,
    ) -> bool {
        with_principal(principal, |principal| {
            principal.is_some_and(|p| query.any_of(|name| grants(p, name)))
        })
    }

    /// True if every listed permission is granted. An empty list grants nothing.
    pub fn has_all_permissions<Q: AnyOf + ?Sized>(
        &self,
        query: &Q,
        principal: Option<&Principal>,
    ) -> bool {
        with_principal(principal, |principal| {
            principal.is_some_and(|p| query.all_of(|name| grants(p, name)))
        })
    }

    pub fn has_role<Q: AnyOf + ?Sized>(&self, roles: &Q, principal: Option<&Principal>) -> bool {
        with_principal(principal, |principal| {
            principal.is_some_and(|p| {
                let names = p.role_names();
                roles.any_of(|wanted| names.iter().any(|name| *name == wanted))
            })
        })
    }

    /// Checks the `"<resource>.<action>"` permission.
    pub fn can_perform_action(
        &self,
        action: &str,
        resource: &str,
        principal: Option<&Principal>,
    ) -> bool {
        let permission = format!("{resource}.{action}");
        self.has_permission(permission.as_str(), principal)
    }

    /// Union of explicit, role and static-table grants. The wildcard stays a
    /// single [`Grant::All`] entry.
    pub fn get_all_permissions(&self, principal: Option<&Principal>) -> BTreeSet<Grant> {
        with_principal(principal, |principal| {
            let Some(p) = principal else {
                return BTreeSet::new();
            };
            p.permissions
                .iter()
                .chain(p.assigned_roles().iter().flat_map(|role| role.permissions.iter()))
                .cloned()
                .map(Grant::Named)
                .chain(p.static_role().grant().grants())
                .collect()
        })
    }

    pub fn is_admin(&self, principal: Option<&Principal>) -> bool {
        with_principal(principal, |principal| principal.is_some_and(is_admin))
    }

    /// Owners and the user a record belongs to may access it, as may admins.
    pub fn can_access_resource(
        &self,
        resource: Option<&OwnedResource>,
        principal: Option<&Principal>,
    ) -> bool {
        let Some(resource) = resource else {
            return false;
        };
        with_principal(principal, |principal| {
            principal.is_some_and(|p| {
                p.id.as_ref().is_some_and(|id| resource.belongs_to(id)) || is_admin(p)
            })
        })
    }

    pub fn require(&self, permission: &str, principal: Option<&Principal>) -> AuthzResult<()> {
        if self.has_permission(permission, principal) {
            Ok(())
        } else {
            debug!(permission, "access denied");
            Err(AuthzError::Denied {
                permission: permission.to_string(),
            })
        }
    }
}

fn grants(principal: &Principal, permission: &str) -> bool {
    principal.permissions.contains(permission)
        || principal
            .assigned_roles()
            .iter()
            .any(|role| role.grants(permission))
        || principal.is_super_admin
        || principal.static_role().grant().covers(permission)
}

// The three checks overlap on purpose: the legacy role name, the assigned
// roles and the flag are each sufficient on their own.
fn is_admin(principal: &Principal) -> bool {
    principal.is_super_admin
        || principal.static_role().is_admin()
        || principal
            .role_names()
            .into_iter()
            .any(|name| ADMIN_ROLES.iter().any(|admin| *admin == name))
}
