//! Integration tests for role and field permission resolution.

use expressui::expressui_core::config::SecurityConfig;
use expressui::expressui_core::error::ErrorKind;
use expressui::expressui_core::traits::Repository;
use expressui::{
    DefaultPolicy, MemoryStore, Permission, PermissionAction, PermissionResolver, RbacEnforcer,
    Role, SecuredUser, SecurityService, User,
};

const ENTITY_TYPES: [&str; 3] = ["Invoice", "Customer", "Order"];
const FIELDS: [&str; 3] = ["amount", "name", "status"];

/// Viewer: deny by default, may only view invoices.
fn viewer() -> Role {
    let role = Role::new("Viewer", DefaultPolicy::Deny);
    let id = role.id;
    role.with_permission(Permission::for_type(id, "Invoice").grant(PermissionAction::View))
}

async fn service_with(roles: Vec<Role>, assigned: &[&str]) -> SecurityService {
    let store = MemoryStore::new();
    for role in roles {
        store.roles().save(role).await.unwrap();
    }
    store.users().save(User::new("alice", "")).await.unwrap();

    let service = SecurityService::new(store, &SecurityConfig::default());
    for name in assigned {
        service.assign_role("alice", name).await.unwrap();
    }
    service
}

#[tokio::test]
async fn test_type_rule_without_field_rules() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let alice = service.load_principal("alice").await.unwrap();

    assert!(alice.is_view_allowed("Invoice").unwrap());
    assert!(!alice.is_edit_allowed("Invoice").unwrap());
    assert!(alice.is_field_view_allowed("Invoice", "amount").unwrap());
    assert!(!alice.is_field_edit_allowed("Invoice", "amount").unwrap());
}

#[tokio::test]
async fn test_field_rule_answers_directly() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let roles = service.store().roles();
    let role = roles.get_by_name("Viewer").await.unwrap();
    roles
        .save_permission(
            &role.id,
            Permission::for_field(role.id, "Invoice", "amount").grant(PermissionAction::Edit),
        )
        .await
        .unwrap();

    let alice = service.load_principal("alice").await.unwrap();
    assert!(alice.is_field_edit_allowed("Invoice", "amount").unwrap());
    // The field record carries view=false and is not combined with type level.
    assert!(!alice.is_field_view_allowed("Invoice", "amount").unwrap());
    assert!(!alice.is_field_edit_allowed("Invoice", "number").unwrap());
}

#[tokio::test]
async fn test_allowing_role_wins_over_denying_role() {
    let viewer = Role::new("Viewer", DefaultPolicy::Deny);
    let admin = Role::new("Admin", DefaultPolicy::Allow);
    let service = service_with(vec![viewer, admin], &["Viewer", "Admin"]).await;

    let alice = service.load_principal("alice").await.unwrap();
    assert!(alice.is_view_allowed("Invoice").unwrap());
    let viewer = alice.roles.iter().find(|r| r.name == "Viewer").unwrap();
    assert!(!viewer.is_view_allowed("Invoice").unwrap());
}

#[tokio::test]
async fn test_store_rejects_duplicate_scope() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let roles = service.store().roles();
    let role = roles.get_by_name("Viewer").await.unwrap();

    let err = roles
        .save_permission(&role.id, Permission::for_type(role.id, "Invoice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let unchanged = roles.get_by_name("Viewer").await.unwrap();
    assert_eq!(unchanged.permissions.len(), 1);
}

#[tokio::test]
async fn test_resaving_same_record_is_not_a_duplicate() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let roles = service.store().roles();
    let role = roles.get_by_name("Viewer").await.unwrap();

    let existing = role.permissions[0].clone().grant(PermissionAction::Edit);
    roles.save_permission(&role.id, existing).await.unwrap();

    let alice = service.load_principal("alice").await.unwrap();
    assert!(alice.is_edit_allowed("Invoice").unwrap());
    assert_eq!(alice.roles[0].permissions.len(), 1);
}

#[test]
fn test_duplicate_records_surface_as_integrity_error() {
    let role = viewer();
    let id = role.id;
    let corrupt = role.with_permission(Permission::for_type(id, "Invoice").grant(PermissionAction::Edit));
    let user = SecuredUser::new(User::new("alice", ""), vec![corrupt]);

    let err = RbacEnforcer::new()
        .check(&user, PermissionAction::View, "Invoice")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Integrity);

    let err = RbacEnforcer::new()
        .require_field(&user, PermissionAction::Edit, "Invoice", "amount")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Integrity);
}

#[test]
fn test_default_policy_without_rules() {
    for (policy, expected) in [(DefaultPolicy::Allow, true), (DefaultPolicy::Deny, false)] {
        let role = Role::new("Plain", policy);
        for entity_type in ENTITY_TYPES {
            for action in PermissionAction::ALL {
                assert_eq!(role.is_allowed(action, entity_type).unwrap(), expected);
            }
            for field in FIELDS {
                assert_eq!(role.is_field_view_allowed(entity_type, field).unwrap(), expected);
                assert_eq!(role.is_field_edit_allowed(entity_type, field).unwrap(), expected);
            }
        }
    }
}

#[test]
fn test_user_is_union_of_roles() {
    let clerk = Role::new("Clerk", DefaultPolicy::Deny);
    let clerk_id = clerk.id;
    let clerk = clerk
        .with_permission(Permission::for_type(clerk_id, "Order").grant(PermissionAction::Create))
        .with_permission(Permission::for_field(clerk_id, "Order", "status"));
    let auditor = Role::new("Auditor", DefaultPolicy::Allow);
    let auditor_id = auditor.id;
    let auditor = auditor.with_permission(Permission::for_type(auditor_id, "Customer"));
    let roles = vec![viewer(), clerk, auditor];

    let user = SecuredUser::new(User::new("alice", ""), roles.clone());

    for entity_type in ENTITY_TYPES {
        for action in PermissionAction::ALL {
            let any = roles
                .iter()
                .any(|role| role.is_allowed(action, entity_type).unwrap());
            assert_eq!(user.is_allowed(action, entity_type).unwrap(), any);
        }
        for field in FIELDS {
            let any_view = roles
                .iter()
                .any(|role| role.is_field_view_allowed(entity_type, field).unwrap());
            let any_edit = roles
                .iter()
                .any(|role| role.is_field_edit_allowed(entity_type, field).unwrap());
            assert_eq!(user.is_field_view_allowed(entity_type, field).unwrap(), any_view);
            assert_eq!(user.is_field_edit_allowed(entity_type, field).unwrap(), any_edit);
        }
    }
}

#[test]
fn test_user_without_roles_is_denied() {
    let user = SecuredUser::new(User::new("alice", ""), Vec::new());
    for entity_type in ENTITY_TYPES {
        for action in PermissionAction::ALL {
            assert!(!user.is_allowed(action, entity_type).unwrap());
        }
        for field in FIELDS {
            assert!(!user.is_field_view_allowed(entity_type, field).unwrap());
            assert!(!user.is_field_edit_allowed(entity_type, field).unwrap());
        }
    }
}

#[tokio::test]
async fn test_snapshot_is_stable_until_reloaded() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let before = service.load_principal("alice").await.unwrap();

    let roles = service.store().roles();
    let role = roles.get_by_name("Viewer").await.unwrap();
    roles
        .save_permission(
            &role.id,
            Permission::for_type(role.id, "Customer").grant(PermissionAction::View),
        )
        .await
        .unwrap();

    assert!(!before.is_view_allowed("Customer").unwrap());
    assert!(before.is_view_allowed("Invoice").unwrap());
    let after = service.load_principal("alice").await.unwrap();
    assert!(after.is_view_allowed("Customer").unwrap());
}

#[tokio::test]
async fn test_repeated_queries_agree() {
    let service = service_with(vec![viewer()], &["Viewer"]).await;
    let alice = service.load_principal("alice").await.unwrap();

    for _ in 0..3 {
        assert!(alice.is_view_allowed("Invoice").unwrap());
        assert!(!alice.is_delete_allowed("Invoice").unwrap());
        assert!(alice.is_field_view_allowed("Invoice", "amount").unwrap());
    }
}
