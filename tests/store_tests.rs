use chrono::{Duration, Utc};
use wboard::auth::verify_password;
use wboard::config::AdminConfig;
use wboard::db::{AccountUpdate, NewAccount, NewNode, NodeUpdate, Store, StoreError};
use wboard::services::{BootstrapOutcome, ensure_admin};

async fn temp_store() -> Store {
    let path = std::env::temp_dir().join(format!("wboard-store-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());

    Store::new(&url).await.expect("Failed to open store")
}

fn admin_config() -> AdminConfig {
    AdminConfig {
        username: "admin".to_string(),
        password: "admin-password".to_string(),
    }
}

#[tokio::test]
async fn test_create_account_defaults() {
    let store = temp_store().await;

    let account = store
        .accounts()
        .create(NewAccount {
            traffic_limit_gb: 50.0,
            ..NewAccount::new("alice", "s3cret")
        })
        .await
        .unwrap();

    assert_eq!(account.username, "alice");
    assert_eq!(account.traffic_limit, 53_687_091_200);
    assert_eq!(account.traffic_used, 0);
    assert!(!account.is_admin);
    assert!(account.is_active);
    assert!(account.due_date.is_none());
    assert!(uuid::Uuid::parse_str(&account.uuid).is_ok());

    assert_ne!(account.password_hash, "s3cret");
    assert!(verify_password("s3cret", &account.password_hash));

    let by_uuid = store.accounts().find_by_uuid(&account.uuid).await.unwrap();
    assert_eq!(by_uuid, Some(account));
}

#[tokio::test]
async fn test_accounts_get_distinct_uuids() {
    let store = temp_store().await;

    let a = store.accounts().create(NewAccount::new("alice", "s3cret")).await.unwrap();
    let b = store.accounts().create(NewAccount::new("bob", "s3cret")).await.unwrap();

    assert_ne!(a.uuid, b.uuid);
    assert_ne!(a.password_hash, b.password_hash);
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let store = temp_store().await;

    store.accounts().create(NewAccount::new("alice", "s3cret")).await.unwrap();
    let err = store
        .accounts()
        .create(NewAccount::new("alice", "another"))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(store.accounts().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_duplicate_creates_leave_one_row() {
    let store = temp_store().await;
    let accounts = store.accounts();

    let (a, b) = tokio::join!(
        accounts.create(NewAccount::new("alice", "s3cret")),
        accounts.create(NewAccount::new("alice", "other-secret")),
    );

    let results = [a, b];
    let created = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::AlreadyExists(_))))
        .count();

    assert_eq!(created, 1);
    assert_eq!(rejected, 1);
    assert_eq!(store.accounts().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_bootstrap_creates_one_admin() {
    let store = temp_store().await;
    let admin = admin_config();

    let (a, b) = tokio::join!(
        ensure_admin(&store.conn, &admin),
        ensure_admin(&store.conn, &admin),
    );

    let mut outcomes = [a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, BootstrapOutcome::AlreadyPresent));

    assert!(matches!(outcomes[0], BootstrapOutcome::Created { .. }));
    assert_eq!(outcomes[1], BootstrapOutcome::AlreadyPresent);
    assert_eq!(store.accounts().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_password_is_rejected() {
    let store = temp_store().await;

    let err = store
        .accounts()
        .create(NewAccount::new("alice", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Credential(_)));
    assert_eq!(store.accounts().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let store = temp_store().await;
    let admin = admin_config();

    let first = ensure_admin(&store.conn, &admin).await.unwrap();
    assert!(matches!(first, BootstrapOutcome::Created { .. }));

    let created = store
        .accounts()
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(created.is_admin);
    assert!(created.is_active);

    let changed = AdminConfig {
        password: "rotated-password".to_string(),
        ..admin_config()
    };
    let second = ensure_admin(&store.conn, &changed).await.unwrap();
    assert_eq!(second, BootstrapOutcome::AlreadyPresent);

    let after = store
        .accounts()
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.password_hash, created.password_hash);
    assert_eq!(store.accounts().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_account() {
    let store = temp_store().await;
    let account = store.accounts().create(NewAccount::new("alice", "s3cret")).await.unwrap();

    let due = Utc::now() + Duration::days(30);
    let updated = store
        .update_account(
            account.id,
            AccountUpdate {
                password: Some("n3w-secret".to_string()),
                traffic_limit_gb: Some(1.0),
                due_date: Some(Some(due)),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.traffic_limit, 1 << 30);
    assert!(!updated.is_active);
    assert_eq!(updated.due_date.map(|d| d.timestamp()), Some(due.timestamp()));
    assert_eq!(updated.uuid, account.uuid);
    assert!(verify_password("n3w-secret", &updated.password_hash));
    assert!(!verify_password("s3cret", &updated.password_hash));

    let cleared = store
        .update_account(
            account.id,
            AccountUpdate {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.due_date.is_none());
    assert_eq!(cleared.traffic_limit, 1 << 30);

    let missing = store
        .update_account(9999, AccountUpdate::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_delete_account() {
    let store = temp_store().await;
    let account = store.accounts().create(NewAccount::new("alice", "s3cret")).await.unwrap();

    assert!(store.accounts().delete(account.id).await.unwrap());
    assert!(!store.accounts().delete(account.id).await.unwrap());
    assert!(store.accounts().find_by_id(account.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_accounts_paginates_in_id_order() {
    let store = temp_store().await;
    for name in ["alice", "bob", "carol"] {
        store.accounts().create(NewAccount::new(name, "s3cret")).await.unwrap();
    }

    let page = store.accounts().list(1, 10).await.unwrap();
    let names: Vec<_> = page.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["bob", "carol"]);

    let first = store.accounts().list(0, 1).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].username, "alice");
}

#[tokio::test]
async fn test_node_crud() {
    let store = temp_store().await;

    let node = store
        .nodes()
        .create(NewNode {
            name: "Tokyo 1".to_string(),
            address: "203.0.113.10".to_string(),
            port: 443,
            protocol: "vless".to_string(),
            config_details: Some(r#"{"flow":"xtls-rprx-vision"}"#.to_string()),
        })
        .await
        .unwrap();
    assert!(node.is_active);

    let other = store
        .nodes()
        .create(NewNode {
            name: "Osaka".to_string(),
            address: "203.0.113.11".to_string(),
            port: 8443,
            protocol: "trojan".to_string(),
            config_details: None,
        })
        .await
        .unwrap();

    let updated = store
        .update_node(
            other.id,
            NodeUpdate {
                is_active: Some(false),
                port: Some(9443),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.port, 9443);
    assert!(!updated.is_active);

    let active = store.nodes().list_active().await.unwrap();
    assert_eq!(active, vec![node.clone()]);
    assert_eq!(store.nodes().list(0, 100).await.unwrap().len(), 2);

    let cleared = store
        .update_node(
            node.id,
            NodeUpdate {
                config_details: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.config_details.is_none());

    assert!(store.nodes().delete(node.id).await.unwrap());
    assert!(store.nodes().find_by_id(node.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_ping() {
    let store = temp_store().await;
    assert!(store.ping().await.is_ok());
}
