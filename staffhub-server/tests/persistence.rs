mod common;

use std::sync::Arc;

use shared::models::{LoginRequest, SignupRequest};
use staffhub_server::auth::JwtConfig;
use staffhub_server::db::DbService;
use staffhub_server::utils::clock::ManualClock;
use staffhub_server::{Config, ServerState};

fn state_for(pool: sqlx::SqlitePool) -> ServerState {
    let config = Config {
        jwt: JwtConfig::with_secret("integration-test-secret-0123456789abcdef"),
        ..Config::from_env()
    };
    ServerState::with_pool(config, pool, Arc::new(ManualClock::new(common::T0)))
}

#[tokio::test]
async fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("staffhub.db");
    let path = path.to_str().unwrap().to_string();

    {
        let db = DbService::new(&path).await.unwrap();
        let state = state_for(db.pool.clone());
        state
            .directory
            .signup(SignupRequest {
                username: "alice".into(),
                email: "alice@acme.test".into(),
                password: "password123".into(),
                company: "Acme".into(),
                designation: None,
                department: None,
            })
            .await
            .unwrap();
        db.pool.close().await;
    }

    // migrations are applied again without error and the data is still there
    let db = DbService::new(&path).await.unwrap();
    let state = state_for(db.pool.clone());
    let response = state
        .directory
        .login(LoginRequest {
            email: "alice@acme.test".into(),
            password: "password123".into(),
        })
        .await
        .unwrap();
    assert_eq!(response.user.company, "Acme");
}

#[tokio::test]
async fn open_shift_uniqueness_is_enforced_by_the_store() {
    let db = DbService::open_in_memory().await.unwrap();
    let state = state_for(db.pool.clone());
    let admin = state
        .directory
        .signup(SignupRequest {
            username: "alice".into(),
            email: "alice@acme.test".into(),
            password: "password123".into(),
            company: "Acme".into(),
            designation: None,
            department: None,
        })
        .await
        .unwrap();

    staffhub_server::db::repository::shift::create(&db.pool, admin.id, common::T0)
        .await
        .unwrap();
    // bypass the service pre-check
    let err = staffhub_server::db::repository::shift::create(&db.pool, admin.id, common::T0 + 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        staffhub_server::db::repository::RepoError::Duplicate(_)
    ));
}

#[tokio::test]
async fn every_pooled_connection_waits_on_locks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staffhub.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    // hold several connections at once so the pool has to open new ones
    let mut held = Vec::new();
    for _ in 0..3 {
        held.push(db.pool.acquire().await.unwrap());
    }
    for conn in held.iter_mut() {
        let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&mut **conn)
            .await
            .unwrap();
        assert_eq!(timeout, 5000);
    }
}
