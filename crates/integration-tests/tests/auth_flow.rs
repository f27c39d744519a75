//! Registration, login and logout scenarios.

#![allow(clippy::unwrap_used)]

use scooter_shop_core::Role;
use scooter_shop_integration_tests::TestContext;
use scooter_shop_storefront::config::StorefrontConfig;
use scooter_shop_storefront::events::StoreEvent;
use scooter_shop_storefront::services::auth::{AuthErrorCode, Destination, SuccessCode};

#[test]
fn test_register_logout_login_scenario() {
    let ctx = TestContext::new();
    let auth = ctx.shop.auth();

    let err = auth.register("Ana", "ana@duoc.cl", "abc12").unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::WeakPassword);
    assert_eq!(err.message(), "La contraseña debe tener al menos 6 caracteres.");

    let ok = auth.register("Ana", "ana@duoc.cl", "abc123").unwrap();
    assert_eq!(ok.code, SuccessCode::RegisteredAndLoggedIn);
    assert_eq!(ok.destination, Some(Destination::DefaultLanding));
    assert_eq!(auth.current_session().unwrap().name, "Ana");

    auth.logout().unwrap();
    assert!(auth.current_session().is_none());

    let err = auth.login("ana@duoc.cl", "zzz999").unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::BadCredentials);
    assert_eq!(err.message(), "Usuario o contraseña incorrectos.");

    let ok = auth.login("ANA@duoc.cl ", "abc123").unwrap();
    assert_eq!(ok.code, SuccessCode::LoggedIn);
    assert_eq!(ok.destination.map(Destination::path), Some("index.html"));
}

#[test]
fn test_disallowed_domains_are_rejected_everywhere() {
    let ctx = TestContext::new();
    let auth = ctx.shop.auth();

    for email in ["jo@yahoo.com", "jo@gmail.co", "jo@duocuc.cl.evil.com", "@gmail.com", "jo"] {
        assert_eq!(
            auth.register("Jo", email, "abc123").unwrap_err().code(),
            AuthErrorCode::BadDomain,
            "{email}"
        );
        assert_eq!(auth.login(email, "abc123").unwrap_err().code(), AuthErrorCode::BadDomain, "{email}");
    }
    assert!(auth.register("Jo", "jo@GMAIL.COM", "abc123").is_ok());
}

#[test]
fn test_configured_domains_replace_defaults() {
    let config = StorefrontConfig {
        allowed_domains: vec!["scooters.cl".to_owned()],
        ..StorefrontConfig::default()
    };
    let ctx = TestContext::with_config(config);
    let auth = ctx.shop.auth();

    let err = auth.register("Jo", "jo@gmail.com", "abc123").unwrap_err();
    assert_eq!(err.message(), "Dominio no permitido. Usa @scooters.cl.");
    assert!(auth.register("Jo", "jo@scooters.cl", "abc123").is_ok());
}

#[test]
fn test_lookup_is_case_and_whitespace_insensitive() {
    let ctx = TestContext::new();
    let auth = ctx.shop.auth();
    auth.register("Jo", "Jo.Perez@Gmail.com", "abc123").unwrap();

    assert!(auth.email_exists("jo.perez@gmail.com"));
    assert!(auth.email_exists("  JO.PEREZ@GMAIL.COM  "));
    assert_eq!(
        auth.register("Otro", "jo.perez@gmail.com", "abc123").unwrap_err().code(),
        AuthErrorCode::AlreadyExists
    );
    assert_eq!(
        auth.login("nadie@gmail.com", "abc123").unwrap_err().code(),
        AuthErrorCode::NotFound
    );
}

#[test]
fn test_builtin_admin_lands_on_admin_page() {
    let ctx = TestContext::new();
    let ok = ctx.shop.auth().login("admin@duocuc.cl", "123456").unwrap();
    assert_eq!(ok.user.role, Role::Admin);
    assert_eq!(ok.destination.map(Destination::path), Some("admin.html"));
}

#[test]
fn test_session_events_carry_projection() {
    let ctx = TestContext::new();
    let mut events = ctx.shop.events().subscribe();

    ctx.shop.auth().register("Jo", "jo@gmail.com", "abc123").unwrap();
    ctx.shop.auth().global_logout().unwrap();

    match events.try_recv().unwrap() {
        StoreEvent::SessionStarted(session) => {
            assert_eq!(session.email.as_str(), "jo@gmail.com");
            assert_eq!(session.role, Role::User);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events.try_recv().unwrap(), StoreEvent::SessionEnded);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ctx = TestContext::in_dir(dir.path());
        ctx.shop.auth().register("Jo", "jo@gmail.com", "abc123").unwrap();
    }

    let ctx = TestContext::in_dir(dir.path());
    let session = ctx.shop.auth().current_session().unwrap();
    assert_eq!(session.email.as_str(), "jo@gmail.com");
    assert!(ctx.shop.auth().login("jo@gmail.com", "abc123").is_ok());
}

#[test]
fn test_legacy_pass_field_still_logs_in() {
    use scooter_shop_storefront::store::{KeyValueStore, MemoryStore, keys};

    let store = MemoryStore::new();
    store
        .set_raw(
            keys::USERS,
            r#"[{"name":"Vieja","email":"vieja@gmail.com","pass":"secreto1","role":"user"}]"#,
        )
        .unwrap();
    let ctx = TestContext::over(store, StorefrontConfig::default());

    let ok = ctx.shop.auth().login("vieja@gmail.com", "secreto1").unwrap();
    assert_eq!(ok.user.points, 0);
    assert!(!ctx.shop.auth().email_exists("admin@duocuc.cl"));
}

#[test]
fn test_stored_records_shape() {
    use scooter_shop_storefront::store::{KeyValueStore, keys};

    let ctx = TestContext::new();
    ctx.shop.auth().register("Jo", " jo@gmail.com ", "abc123").unwrap();

    let users: serde_json::Value =
        serde_json::from_str(&ctx.shop.store().get_raw(keys::USERS).unwrap()).unwrap();
    let jo = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "jo@gmail.com")
        .unwrap();
    assert_eq!(jo["password"], "abc123");
    assert_eq!(jo["role"], "user");
    assert_eq!(jo["points"], 0);

    let session: serde_json::Value =
        serde_json::from_str(&ctx.shop.store().get_raw(keys::CURRENT_USER).unwrap()).unwrap();
    assert_eq!(session["name"], "Jo");
    assert!(session.get("password").is_none());
}

#[test]
fn test_register_keeps_users_it_cannot_parse() {
    use scooter_shop_storefront::store::{KeyValueStore, MemoryStore, keys};

    let store = MemoryStore::new();
    store
        .set_raw(
            keys::USERS,
            r#"[{"name":"Admin","email":"admin@duocuc.cl","password":"123456","role":"admin"},
                {"name":"Rara","email":"rara@gmail.com","password":"123456","role":"user","points":12.5}]"#,
        )
        .unwrap();
    let ctx = TestContext::over(store, StorefrontConfig::default());
    let auth = ctx.shop.auth();
    assert!(auth.email_exists("admin@duocuc.cl"));
    assert!(!auth.email_exists("rara@gmail.com"));

    auth.register("Jo", "jo@gmail.com", "abc123").unwrap();

    assert!(auth.email_exists("admin@duocuc.cl"));
    assert!(auth.login("admin@duocuc.cl", "123456").is_ok());
    let raw = ctx.shop.store().get_raw(keys::USERS).unwrap();
    assert!(raw.contains("rara@gmail.com"));
    assert!(raw.contains("jo@gmail.com"));
}

#[test]
fn test_register_refuses_to_replace_unreadable_users() {
    use scooter_shop_storefront::store::{KeyValueStore, MemoryStore, keys};

    let store = MemoryStore::new();
    store.set_raw(keys::USERS, "[{broken").unwrap();
    let ctx = TestContext::over(store, StorefrontConfig::default());

    let err = ctx.shop.auth().register("Jo", "jo@gmail.com", "abc123").unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::Storage);
    assert_eq!(ctx.shop.store().get_raw(keys::USERS).as_deref(), Some("[{broken"));
    assert!(ctx.shop.auth().current_session().is_none());
}
