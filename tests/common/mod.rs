#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use schooldesk::config::SchoolConfig;
use schooldesk::db::SchoolStore;
use schooldesk::server::router::{SchoolState, school_router};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

pub const API_KEY: &str = "pwd";

pub fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "schooldesk-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

pub fn remove_db(path: &PathBuf) {
    let _ = fs::remove_file(path);
    for suffix in ["-wal", "-shm"] {
        let mut side = path.clone().into_os_string();
        side.push(suffix);
        let _ = fs::remove_file(side);
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: SchoolStore,
    pub admin_id: i64,
    path: PathBuf,
}

impl TestApp {
    pub async fn spawn(tag: &str) -> Self {
        let path = temp_db_path(tag);
        let database_url = format!("sqlite:{}", path.display());
        let store = schooldesk::db::spawn(&database_url, &SchoolConfig::default())
            .await
            .expect("failed to open test database");
        let admin_id: i64 =
            sqlx::query_scalar("SELECT id FROM users WHERE role = 'SUPER_ADMIN' ORDER BY id LIMIT 1")
                .fetch_one(store.pool())
                .await
                .expect("bootstrap admin missing");
        let state = SchoolState::new(store.clone(), Arc::from(API_KEY));
        Self {
            app: school_router(state),
            store,
            admin_id,
            path,
        }
    }

    /// Sends a request with the API key and, when given, the acting user.
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-api-key", API_KEY);
        if let Some(id) = user {
            builder = builder.header("x-user-id", id.to_string());
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn create_user(&self, actor: i64, name: &str, email: &str, role: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/api/users",
                Some(actor),
                Some(serde_json::json!({ "name": name, "email": email, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");
        body["data"]["id"].as_i64().expect("user id")
    }

    pub async fn create_student(&self, name: &str, admission_no: &str, monthly_fee: i64) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/api/students",
                Some(self.admin_id),
                Some(serde_json::json!({
                    "name": name,
                    "admissionNo": admission_no,
                    "monthlyFee": monthly_fee,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create student failed: {body}");
        body["data"]["id"].as_i64().expect("student id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        remove_db(&self.path);
    }
}
