//! 集成测试公共工具: 内存数据库 + 手动时钟

#![allow(dead_code)]

use std::sync::Arc;

use shared::models::{Employee, EmployeeCreate, SignupRequest};
use staffhub_server::auth::{Caller, JwtConfig};
use staffhub_server::db::DbService;
use staffhub_server::utils::clock::ManualClock;
use staffhub_server::{Config, ServerState};

/// 2025-06-15 15:06:40 UTC
pub const T0: i64 = 1_750_000_000_000;
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const HOUR_MS: i64 = 60 * 60 * 1000;

pub struct TestApp {
    pub state: ServerState,
    pub clock: Arc<ManualClock>,
}

pub async fn test_app() -> TestApp {
    let db = DbService::open_in_memory().await.unwrap();
    let clock = Arc::new(ManualClock::new(T0));
    let config = Config {
        jwt: JwtConfig::with_secret("integration-test-secret-0123456789abcdef"),
        ..Config::from_env()
    };
    let state = ServerState::with_pool(config, db.pool, clock.clone());
    TestApp { state, clock }
}

pub fn caller_of(e: &Employee) -> Caller {
    Caller {
        id: e.id,
        role: e.role,
        company: e.company.clone(),
    }
}

impl TestApp {
    pub async fn signup_admin(&self, name: &str, company: &str) -> Employee {
        self.state
            .directory
            .signup(SignupRequest {
                username: name.to_string(),
                email: format!("{name}@{}.test", company.to_lowercase()),
                password: "password123".to_string(),
                company: company.to_string(),
                designation: Some("Manager".to_string()),
                department: None,
            })
            .await
            .unwrap()
    }

    pub async fn add_employee(&self, admin: &Employee, name: &str) -> Employee {
        self.state
            .directory
            .create_employee(
                &caller_of(admin),
                EmployeeCreate {
                    username: name.to_string(),
                    email: format!("{name}@{}.test", admin.company.to_lowercase()),
                    password: "password123".to_string(),
                    designation: None,
                    department: Some("Ops".to_string()),
                },
            )
            .await
            .unwrap()
    }
}
