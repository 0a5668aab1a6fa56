//! Integration tests for the store: cascades, seeds, and concurrent writes.

use expressui::expressui_core::error::ErrorKind;
use expressui::expressui_core::traits::Repository;
use expressui::expressui_store::SeedData;
use expressui::{DefaultPolicy, MemoryStore, Permission, PermissionAction, PermissionResolver, Role, User};

const SEED: &str = r#"{
    "roles": [
        {
            "name": "Viewer",
            "default_policy": "DENY",
            "permissions": [
                { "entity_type": "Invoice", "view": true },
                { "entity_type": "Invoice", "field": "amount", "view": false }
            ]
        },
        { "name": "Admin", "default_policy": "ALLOW" }
    ],
    "users": [
        { "login_name": "alice", "roles": ["Viewer"] },
        { "login_name": "bobby", "roles": ["Viewer", "Admin"], "account_locked": true }
    ]
}"#;

async fn seeded() -> MemoryStore {
    MemoryStore::from_seed(&SeedData::from_json(SEED).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_seed_builds_roles_and_links() {
    let store = seeded().await;

    assert_eq!(store.roles().count().await.unwrap(), 2);
    assert_eq!(store.users().count().await.unwrap(), 2);

    let (bobby, roles) = store.load_user_with_roles("bobby").await.unwrap().unwrap();
    assert!(bobby.account_locked);
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Admin", "Viewer"]);

    let viewer = store.roles().get_by_name("Viewer").await.unwrap();
    assert!(viewer.is_view_allowed("Invoice").unwrap());
    assert!(!viewer.is_field_view_allowed("Invoice", "amount").unwrap());
}

#[tokio::test]
async fn test_deleting_role_cascades() {
    let store = seeded().await;
    let roles = store.roles();
    let viewer = roles.get_by_name("Viewer").await.unwrap();

    assert!(roles.delete(&viewer.id).await.unwrap());
    assert!(roles.find_by_id(&viewer.id).await.unwrap().is_none());

    let alice = store.users().get_by_login_name("alice").await.unwrap();
    assert!(store.users().roles_for(&alice.id).await.unwrap().is_empty());
    assert!(store.users().users_in_role(&viewer.id).await.unwrap().is_empty());

    // Users themselves survive.
    assert_eq!(store.users().count().await.unwrap(), 2);
    assert!(!roles.delete(&viewer.id).await.unwrap());
}

#[tokio::test]
async fn test_deleting_user_keeps_roles() {
    let store = seeded().await;
    let users = store.users();
    let bobby = users.get_by_login_name("bobby").await.unwrap();
    let admin = store.roles().get_by_name("Admin").await.unwrap();

    assert!(users.delete(&bobby.id).await.unwrap());
    assert!(users.users_in_role(&admin.id).await.unwrap().is_empty());
    assert_eq!(store.roles().count().await.unwrap(), 2);

    let viewer = store.roles().get_by_name("Viewer").await.unwrap();
    let holders = users.users_in_role(&viewer.id).await.unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].login_name, "alice");
}

#[tokio::test]
async fn test_seed_with_duplicate_scope_is_rejected() {
    let seed = SeedData::from_json(
        r#"{ "roles": [ { "name": "Broken", "default_policy": "DENY", "permissions": [
            { "entity_type": "Invoice", "view": true },
            { "entity_type": "Invoice", "edit": true }
        ] } ] }"#,
    )
    .unwrap();

    let issues = seed.audit();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].subject.contains("Broken"));

    let err = MemoryStore::from_seed(&seed).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_seed_with_unknown_role_fails_import() {
    let seed = SeedData::from_json(
        r#"{ "users": [ { "login_name": "alice", "roles": ["Ghost"] } ] }"#,
    )
    .unwrap();

    assert!(seed.audit().iter().any(|i| i.message == "Unknown role 'Ghost'"));
    let err = MemoryStore::from_seed(&seed).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_concurrent_duplicate_writes_admit_one() {
    let store = MemoryStore::new();
    let role = store
        .roles()
        .save(Role::new("Clerk", DefaultPolicy::Deny))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let roles = store.roles();
        let role_id = role.id;
        handles.push(tokio::spawn(async move {
            roles
                .save_permission(
                    &role_id,
                    Permission::for_type(role_id, "Invoice").grant(PermissionAction::View),
                )
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(e) => assert_eq!(e.kind, ErrorKind::Conflict),
        }
    }
    assert_eq!(accepted, 1);

    let stored = store.roles().get_by_name("Clerk").await.unwrap();
    assert_eq!(stored.permissions.len(), 1);
    assert!(stored.is_view_allowed("Invoice").unwrap());
}

#[tokio::test]
async fn test_assigning_twice_keeps_one_link() {
    let store = MemoryStore::new();
    let role = store
        .roles()
        .save(Role::new("Admin", DefaultPolicy::Allow))
        .await
        .unwrap();
    let user = store.users().save(User::new("alice", "")).await.unwrap();

    assert!(store.users().assign_role(&user.id, &role.id).await.unwrap());
    assert!(!store.users().assign_role(&user.id, &role.id).await.unwrap());
    assert_eq!(store.users().roles_for(&user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_import_keeps_existing_data() {
    let store = seeded().await;
    let partial = SeedData::from_json(
        r#"{ "roles": [ { "name": "Auditor", "default_policy": "DENY" } ],
             "users": [ { "login_name": "carol", "roles": ["Auditor", "Ghost"] } ] }"#,
    )
    .unwrap();

    assert!(store.import_seed(&partial).await.is_err());
    assert_eq!(store.roles().count().await.unwrap(), 2);
    assert_eq!(store.users().count().await.unwrap(), 2);
    assert!(store.users().find_by_login_name("carol").await.unwrap().is_none());
}
