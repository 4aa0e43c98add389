use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::AuthzResult,
    permission::Permission,
    role::{LegacyRole, Role},
};

/// Opaque principal identifier. Numbers and strings never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PrincipalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrincipalId::Number(value) => write!(f, "{value}"),
            PrincipalId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for PrincipalId {
    fn from(value: i64) -> Self {
        PrincipalId::Number(value)
    }
}

impl From<&str> for PrincipalId {
    fn from(value: &str) -> Self {
        PrincipalId::Text(value.to_string())
    }
}

/// Session payload as it arrives from the host, before normalization.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPrincipal {
    pub id: Option<PrincipalId>,
    pub permissions: Option<Vec<String>>,
    pub roles: Option<Vec<RawRole>>,
    pub role: Option<String>,
    #[serde(alias = "user_type")]
    pub user_type: Option<String>,
    #[serde(alias = "is_super_admin")]
    pub is_super_admin: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawRole {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        permissions: Option<Vec<String>>,
    },
}

/// Normalized principal consulted by every evaluator call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: Option<PrincipalId>,
    pub permissions: BTreeSet<Permission>,
    /// `None` when the payload carried no `roles` at all.
    pub roles: Option<Vec<Role>>,
    pub legacy_role: Option<String>,
    pub is_super_admin: bool,
}

impl Principal {
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn from_json(payload: &str) -> AuthzResult<Self> {
        let raw: RawPrincipal = serde_json::from_str(payload)?;
        Ok(raw.into())
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.get_or_insert_with(Vec::new).push(role);
        self
    }

    pub fn with_legacy_role(mut self, name: impl Into<String>) -> Self {
        self.legacy_role = Some(name.into());
        self
    }

    pub fn super_admin(mut self, flag: bool) -> Self {
        self.is_super_admin = flag;
        self
    }

    pub fn static_role(&self) -> LegacyRole {
        LegacyRole::resolve(self.legacy_role.as_deref())
    }

    pub fn assigned_roles(&self) -> &[Role] {
        self.roles.as_deref().unwrap_or_default()
    }

    /// Names from `roles`, or the legacy single role when `roles` is absent.
    /// An explicitly empty `roles` list yields no names.
    pub fn role_names(&self) -> Vec<&str> {
        match &self.roles {
            Some(roles) => roles.iter().map(|role| role.name.as_str()).collect(),
            None => self.legacy_role.as_deref().into_iter().collect(),
        }
    }
}

impl From<RawPrincipal> for Principal {
    fn from(raw: RawPrincipal) -> Self {
        let subject = raw
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let permissions = parse_permissions(&subject, raw.permissions.unwrap_or_default());
        let roles = raw.roles.map(|roles| {
            roles
                .into_iter()
                .map(|role| match role {
                    RawRole::Name(name) => Role::new(name),
                    RawRole::Full { name, permissions } => Role {
                        permissions: parse_permissions(&subject, permissions.unwrap_or_default()),
                        name,
                    },
                })
                .collect()
        });
        Self {
            id: raw.id,
            permissions,
            roles,
            legacy_role: raw.role.or(raw.user_type),
            is_super_admin: raw.is_super_admin.unwrap_or(false),
        }
    }
}

fn parse_permissions(subject: &str, names: Vec<String>) -> BTreeSet<Permission> {
    names
        .into_iter()
        .filter_map(|name| match Permission::parse(&name) {
            Ok(permission) => Some(permission),
            Err(err) => {
                warn!(principal = subject, %err, "dropping permission from session payload");
                None
            }
        })
        .collect()
}

/// Anything with an owner, as checked by `can_access_resource`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedResource {
    pub owner_id: Option<PrincipalId>,
    pub user_id: Option<PrincipalId>,
}

impl OwnedResource {
    pub fn owned_by(id: impl Into<PrincipalId>) -> Self {
        Self {
            owner_id: Some(id.into()),
            user_id: None,
        }
    }

    pub fn of_user(id: impl Into<PrincipalId>) -> Self {
        Self {
            owner_id: None,
            user_id: Some(id.into()),
        }
    }

    pub fn belongs_to(&self, id: &PrincipalId) -> bool {
        self.user_id.as_ref() == Some(id) || self.owner_id.as_ref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_camel_case_payload() {
        let principal = Principal::from_json(
            r#"{
                "id": 2,
                "roles": [{"name": "hr_manager", "permissions": ["hr.edit"]}, "auditor"],
                "userType": "manager",
                "isSuperAdmin": false
            }"#,
        )
        .unwrap();
        assert_eq!(principal.id, Some(PrincipalId::Number(2)));
        assert_eq!(principal.role_names(), vec!["hr_manager", "auditor"]);
        assert!(principal.assigned_roles()[0].grants("hr.edit"));
        assert!(principal.assigned_roles()[1].permissions.is_empty());
        assert_eq!(principal.static_role(), LegacyRole::Manager);
    }

    #[test]
    fn role_field_wins_over_user_type() {
        let principal =
            Principal::from_json(r#"{"id": "a", "role": "admin", "user_type": "employee"}"#)
                .unwrap();
        assert_eq!(principal.legacy_role.as_deref(), Some("admin"));
        assert_eq!(principal.role_names(), vec!["admin"]);
    }

    #[test]
    fn drops_blank_and_wildcard_permissions() {
        let principal =
            Principal::from_json(r#"{"id": 1, "permissions": ["*", "", "read employees"]}"#)
                .unwrap();
        let names: Vec<_> = principal.permissions.iter().map(Permission::as_str).collect();
        assert_eq!(names, vec!["read employees"]);
    }

    #[test]
    fn empty_roles_list_suppresses_legacy_fallback() {
        let listed = Principal::from_json(r#"{"id": 1, "role": "manager", "roles": []}"#).unwrap();
        assert_eq!(listed.roles, Some(Vec::new()));
        assert!(listed.role_names().is_empty());
        let absent = Principal::from_json(r#"{"id": 1, "role": "manager"}"#).unwrap();
        assert_eq!(absent.roles, None);
        assert_eq!(absent.role_names(), vec!["manager"]);
    }

    #[test]
    fn null_collections_are_treated_as_missing() {
        let principal = Principal::from_json(
            r#"{"id": 1, "permissions": null, "roles": [{"name": "x", "permissions": null}], "isSuperAdmin": null}"#,
        )
        .unwrap();
        assert!(principal.permissions.is_empty());
        assert_eq!(principal.role_names(), vec!["x"]);
        assert!(principal.assigned_roles()[0].permissions.is_empty());
        assert!(!principal.is_super_admin);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Principal::from_json("not json").is_err());
    }

    #[test]
    fn ids_compare_strictly() {
        let resource = OwnedResource::of_user(7);
        assert!(resource.belongs_to(&PrincipalId::Number(7)));
        assert!(!resource.belongs_to(&PrincipalId::from("7")));
        assert!(!OwnedResource::default().belongs_to(&PrincipalId::Number(7)));
    }
}
