//! Integration tests for authentication and principal loading.

use expressui::expressui_core::config::SecurityConfig;
use expressui::expressui_core::error::ErrorKind;
use expressui::expressui_core::traits::Repository;
use expressui::{
    DefaultPolicy, MemoryStore, PermissionAction, Role, SecurityService,
};

const PASSWORD: &str = "Sturdy-Lantern-42-Orbit";

async fn setup() -> SecurityService {
    let service = SecurityService::new(MemoryStore::new(), &SecurityConfig::default());
    service
        .store()
        .roles()
        .save(Role::new("Admin", DefaultPolicy::Allow))
        .await
        .unwrap();
    service.create_user("alice", PASSWORD).await.unwrap();
    service.assign_role("alice", "Admin").await.unwrap();
    service
}

#[tokio::test]
async fn test_login_yields_enforceable_principal() {
    let service = setup().await;
    let alice = service.authenticate("alice", PASSWORD).await.unwrap();

    assert!(
        service
            .enforcer()
            .require(&alice, PermissionAction::Delete, "Invoice")
            .is_ok()
    );
}

#[tokio::test]
async fn test_login_name_is_case_insensitive() {
    let service = setup().await;
    let alice = service.authenticate("ALICE", PASSWORD).await.unwrap();
    assert_eq!(alice.login_name(), "alice");
}

#[tokio::test]
async fn test_password_hash_is_not_plaintext() {
    let service = setup().await;
    let user = service
        .store()
        .users()
        .get_by_login_name("alice")
        .await
        .unwrap();

    assert!(user.password_hash.starts_with("$argon2"));
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_blocked_accounts_are_refused() {
    let cases: [(fn(&mut expressui::User), &str); 4] = [
        (|u| u.enabled = false, "Account is disabled"),
        (|u| u.account_locked = true, "Account is locked"),
        (|u| u.account_expired = true, "Account has expired"),
        (|u| u.credentials_expired = true, "Credentials have expired"),
    ];

    for (block, message) in cases {
        let service = setup().await;
        let users = service.store().users();
        let mut alice = users.get_by_login_name("alice").await.unwrap();
        block(&mut alice);
        users.save(alice).await.unwrap();

        let err = service.authenticate("alice", PASSWORD).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, message);
    }
}

#[tokio::test]
async fn test_blocked_account_with_wrong_password_reveals_nothing() {
    let service = setup().await;
    let users = service.store().users();
    let mut alice = users.get_by_login_name("alice").await.unwrap();
    alice.account_locked = true;
    users.save(alice).await.unwrap();

    let err = service.authenticate("alice", "wrong").await.unwrap_err();
    assert_eq!(err.message, "Invalid login name or password");
}

#[tokio::test]
async fn test_change_password_clears_expired_credentials() {
    let service = setup().await;
    let users = service.store().users();
    let mut alice = users.get_by_login_name("alice").await.unwrap();
    alice.credentials_expired = true;
    users.save(alice).await.unwrap();

    let new_password = "Quiet-Harbor-17-Meadow";
    service
        .change_password("alice", PASSWORD, new_password)
        .await
        .unwrap();
    assert!(service.authenticate("alice", new_password).await.is_ok());
}

#[tokio::test]
async fn test_duplicate_login_is_conflict() {
    let service = setup().await;
    let err = service.create_user("Alice", PASSWORD).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_relaxed_password_policy() {
    let config = SecurityConfig {
        password_min_length: 4,
        enforce_password_strength: false,
    };
    let service = SecurityService::new(MemoryStore::new(), &config);

    assert!(service.create_user("bobby", "pass").await.is_ok());
    let err = service.create_user("carol", "abc").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_unknown_principal_is_not_found() {
    let service = setup().await;
    let err = service.load_principal("nobody").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_corrupt_stored_hash_does_not_reveal_account() {
    let service = setup().await;
    let users = service.store().users();
    let mut alice = users.get_by_login_name("alice").await.unwrap();
    alice.password_hash = "$argon2id$...".to_string();
    users.save(alice).await.unwrap();

    let existing = service.authenticate("alice", PASSWORD).await.unwrap_err();
    let unknown = service.authenticate("nobody", PASSWORD).await.unwrap_err();
    assert_eq!(existing.kind, unknown.kind);
    assert_eq!(existing.message, unknown.message);
}
