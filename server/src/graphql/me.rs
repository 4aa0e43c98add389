use async_graphql::SimpleObject;
use platform_authz::{AccessEvaluator, Principal};
use serde::Serialize;

#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub id: Option<String>,
    pub roles: Vec<String>,
    pub static_role: String,
    pub permissions: Vec<String>,
    pub is_admin: bool,
}

impl MePayload {
    pub fn from_principal(principal: &Principal) -> Self {
        let evaluator = AccessEvaluator;
        Self {
            id: principal.id.as_ref().map(ToString::to_string),
            roles: principal
                .role_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            static_role: principal.static_role().to_string(),
            permissions: evaluator
                .get_all_permissions(Some(principal))
                .iter()
                .map(ToString::to_string)
                .collect(),
            is_admin: evaluator.is_admin(Some(principal)),
        }
    }
}

/// One row of the compiled-in role table.
#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct RoleEntry {
    pub name: String,
    pub permissions: Vec<String>,
}

pub fn role_table() -> Vec<RoleEntry> {
    platform_authz::LegacyRole::ALL
        .into_iter()
        .map(|role| RoleEntry {
            name: role.to_string(),
            permissions: role
                .grant()
                .grants()
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect()
}
