use std::sync::Arc;

use platform_authz::{AccessEvaluator, Grant, OwnedResource, current};
use serde_json::json;
use suite_tests::{PERMISSION_PROBES, principal};

const EVAL: AccessEvaluator = AccessEvaluator;

#[test]
fn explicit_grants() {
    let p = principal(json!({"id": 1, "permissions": ["read employees"], "roles": []}));
    assert!(EVAL.has_permission("read employees", Some(&p)));
    assert!(!EVAL.has_permission("write employees", Some(&p)));
}

#[test]
fn role_inheritance_without_explicit_permissions() {
    let p = principal(json!({"id": 2, "roles": [{"name": "hr_manager", "permissions": ["hr.edit"]}]}));
    assert!(EVAL.has_permission("hr.edit", Some(&p)));
}

#[test]
fn static_table_for_simple_principals() {
    let p = principal(json!({"id": 3, "role": "employee"}));
    assert!(EVAL.has_permission("hr.self_service.view", Some(&p)));
    assert!(!EVAL.has_permission("employees.manage", Some(&p)));
}

#[test]
fn super_admin_flag_grants_anything() {
    let p = principal(json!({"id": 4, "isSuperAdmin": true}));
    assert!(EVAL.has_permission("literally.anything", Some(&p)));
}

#[test]
fn action_on_resource() {
    let p = principal(json!({"id": 5, "permissions": ["hr.skills.view"]}));
    assert!(EVAL.can_perform_action("view", "hr.skills", Some(&p)));
}

#[test]
fn ownership() {
    let owned = OwnedResource::owned_by(9_i64);
    assert!(EVAL.can_access_resource(Some(&owned), Some(&principal(json!({"id": 9})))));
    assert!(!EVAL.can_access_resource(
        Some(&owned),
        Some(&principal(json!({"id": 10, "isSuperAdmin": false})))
    ));
    let of_user = OwnedResource::of_user(7_i64);
    assert!(EVAL.can_access_resource(
        Some(&of_user),
        Some(&principal(json!({"id": 7, "isSuperAdmin": false})))
    ));
}

#[test]
fn wildcard_role_covers_unlisted_permissions() {
    let p = principal(json!({"role": "super_admin"}));
    for probe in PERMISSION_PROBES {
        assert!(EVAL.has_permission(*probe, Some(&p)), "{probe}");
    }
    assert_eq!(
        EVAL.get_all_permissions(Some(&p)).into_iter().collect::<Vec<_>>(),
        vec![Grant::All]
    );
}

#[test]
fn array_queries_match_single_queries() {
    let fixtures = [
        principal(json!({"id": 1, "permissions": ["read employees"]})),
        principal(json!({"id": 2, "userType": "manager"})),
        principal(json!({"id": 3, "roles": ["auditor", {"name": "x", "permissions": ["hr.edit"]}]})),
    ];
    for p in &fixtures {
        for a in PERMISSION_PROBES {
            for b in PERMISSION_PROBES {
                assert_eq!(
                    EVAL.has_permission(&[*a, *b], Some(p)),
                    EVAL.has_permission(*a, Some(p)) || EVAL.has_permission(*b, Some(p)),
                );
            }
        }
        let none: [&str; 0] = [];
        assert!(!EVAL.has_permission(&none, Some(p)));
    }
}

#[test]
fn admin_checks_are_independent() {
    let flagged = principal(json!({"id": 1, "isSuperAdmin": true, "role": "employee", "roles": [{"name": "intern"}]}));
    assert!(EVAL.is_admin(Some(&flagged)));
    let legacy = principal(json!({"id": 1, "role": "admin", "isSuperAdmin": false, "roles": [{"name": "intern"}]}));
    assert!(EVAL.is_admin(Some(&legacy)));
    let by_roles = principal(json!({"id": 1, "role": "employee", "roles": ["admin"]}));
    assert!(EVAL.is_admin(Some(&by_roles)));
    assert!(EVAL.has_role(&["intern", "admin"], Some(&by_roles)));
}

#[test]
fn legacy_role_is_used_only_without_roles() {
    let p = principal(json!({"id": 1, "role": "manager", "roles": [{"name": "auditor"}]}));
    assert!(!EVAL.has_role("manager", Some(&p)));
    assert!(EVAL.has_role("auditor", Some(&p)));
    let q = principal(json!({"id": 1, "userType": "manager"}));
    assert!(EVAL.has_role("manager", Some(&q)));
}

#[test]
fn all_permissions_is_a_deduplicated_union() {
    let p = principal(json!({
        "id": 1,
        "role": "user",
        "permissions": ["dashboard.view", "read employees"],
        "roles": [{"name": "x", "permissions": ["read employees", "hr.edit"]}]
    }));
    let names: Vec<String> = EVAL
        .get_all_permissions(Some(&p))
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        names,
        vec!["dashboard.view", "hr.edit", "hr.profile.view", "read employees"]
    );
}

#[test]
fn missing_principal_denies_everything() {
    for probe in PERMISSION_PROBES {
        assert!(!EVAL.has_permission(*probe, None));
    }
    assert!(!EVAL.has_role("user", None));
    assert!(!EVAL.is_admin(None));
    assert!(!EVAL.can_access_resource(Some(&OwnedResource::owned_by(1_i64)), None));
}

#[tokio::test]
async fn scoped_principal_reflects_latest_state() {
    let before = Arc::new(principal(json!({"id": 1, "role": "employee"})));
    let after = Arc::new(principal(json!({"id": 1, "role": "admin"})));
    let denied = current::scope(Some(before), async { EVAL.has_permission("users.manage", None) }).await;
    let granted = current::scope(Some(after), async { EVAL.has_permission("users.manage", None) }).await;
    assert!(!denied);
    assert!(granted);
}

#[test]
fn empty_roles_list_disables_legacy_role_membership() {
    let p = principal(json!({"id": 1, "role": "manager", "roles": []}));
    assert!(!EVAL.has_role("manager", Some(&p)));
    assert!(EVAL.has_permission("hr.leaves.approve", Some(&p)));
}

#[test]
fn padded_permission_names_are_opaque_tokens() {
    let p = principal(json!({"id": 1, "permissions": ["hr.view "]}));
    assert!(EVAL.has_permission("hr.view ", Some(&p)));
    assert!(!EVAL.has_permission("hr.view", Some(&p)));
}

#[test]
fn null_role_permissions_do_not_reject_the_principal() {
    let p = principal(json!({"id": 1, "roles": [{"name": "x", "permissions": null}]}));
    assert!(EVAL.has_role("x", Some(&p)));
    assert!(!EVAL.has_permission("hr.edit", Some(&p)));
}

#[test]
fn literal_wildcard_in_explicit_permissions_grants_nothing() {
    let p = principal(json!({"id": 1, "permissions": ["*"], "roles": [{"name": "x", "permissions": ["*"]}]}));
    assert!(!EVAL.has_permission("*", Some(&p)));
    assert!(!EVAL.has_permission("users.manage", Some(&p)));
    assert!(!EVAL.get_all_permissions(Some(&p)).contains(&Grant::All));
}
