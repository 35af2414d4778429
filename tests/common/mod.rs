use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use maruadmin::api::{AppState, SharedState};
use maruadmin::config::AdminConfig;
use maruadmin::relay::{CommandRunner, Invocation, ProcessOutput};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Runner returning canned output and recording every invocation
#[allow(dead_code)]
pub struct StubRunner {
    output: ProcessOutput,
    calls: Mutex<Vec<Invocation>>,
}

#[allow(dead_code)]
impl StubRunner {
    pub fn ok(stdout: &str) -> Arc<Self> {
        Arc::new(Self {
            output: ProcessOutput {
                code: Some(0),
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(code: i32, stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            output: ProcessOutput {
                code: Some(code),
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for StubRunner {
    async fn run(&self, invocation: &Invocation) -> maruadmin::Result<ProcessOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(self.output.clone())
    }
}

/// Config whose every path lives under `dir`
#[allow(dead_code)]
pub fn temp_admin_config(dir: &TempDir) -> AdminConfig {
    let mut config = AdminConfig::default();
    config.storage.history_db = Some(dir.path().join("web").join("admin.db"));
    config.storage.settings_path = Some(dir.path().join("config.json"));
    config.storage.env_file = dir.path().join(".env");
    config.logging.file_path = Some(dir.path().join("dashboard.log"));
    config
}

/// Application state on a fresh temp directory
#[allow(dead_code)]
pub fn test_state(runner: Arc<StubRunner>) -> (SharedState, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let config = temp_admin_config(&tmp);
    let state = AppState::new(config, runner).expect("failed to build app state");
    (state, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("maruadmin.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

#[allow(dead_code)]
pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}
