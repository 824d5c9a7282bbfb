//! End-to-end tests: boot the real accept loop on an ephemeral port and
//! talk HTTP/1.1 to it over a plain TCP socket.

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use heart_survival::config::{AppState, Config};
use heart_survival::model::ArtifactError;
use heart_survival::server::{create_reusable_listener, start_server_loop};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const SCENARIO: &str = "age=60&anaemia=Yes&creatinine_phosphokinase=500&diabetes=No\
    &ejection_fraction=38&high_blood_pressure=No&platelets=260&serum_creatinine=1.1\
    &serum_sodium=137&sex=Male&smoking=No&time=115";

struct TestServer {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl TestServer {
    async fn start(config: Config) -> Self {
        let state = AppState::load(config).expect("artifacts load");
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(start_server_loop(listener, state, async move {
            let _ = stopped.await;
            "test"
        }));
        Self {
            addr,
            stop: Some(stop),
            task,
        }
    }

    async fn request(&self, raw: &str) -> (u16, String) {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        // an early 413 may close with unread request bytes; keep what arrived
        let _ = stream.read_to_end(&mut buf).await;
        let text = String::from_utf8_lossy(&buf).into_owned();
        let status = text
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let body = text
            .split_once("\r\n\r\n")
            .map(|(_, b)| b.to_string())
            .unwrap_or_default();
        (status, body)
    }

    async fn post(&self, body: &str, fragment: bool) -> (u16, String) {
        let extra = if fragment {
            "X-Requested-With: XMLHttpRequest\r\n"
        } else {
            ""
        };
        self.request(&format!(
            "POST / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Content-Type: application/x-www-form-urlencoded\r\n{extra}\
             Content-Length: {}\r\n\r\n{body}",
            body.len()
        ))
        .await
    }

    async fn get(&self, path: &str) -> (u16, String) {
        self.request(&format!(
            "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
        ))
        .await
    }

    async fn shutdown(mut self) -> usize {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap()
    }
}

fn base_config() -> Config {
    let mut config = Config::load_from("definitely/not/a/config/file").unwrap();
    config.logging.access_log = false;
    config.performance.write_timeout = 1;
    config
}

fn write_artifact(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// Identity scaler plus a model that flags anyone older than 65
fn age_threshold_config(dir: &Path) -> Config {
    let mut config = base_config();
    config.model.scaler_path = write_artifact(
        dir,
        "scaler.toml",
        "type = \"standard\"\nmean = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]\nscale = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]\n",
    );
    config.model.model_path = write_artifact(
        dir,
        "model.json",
        r#"{"type":"decision_tree","nodes":[
            {"feature":0,"threshold":65.0,"left":1,"right":2},
            {"class":0},
            {"class":1}
        ]}"#,
    );
    config
}

#[tokio::test]
async fn test_bundled_artifacts_answer_scenario() {
    let server = TestServer::start(base_config()).await;

    let (status, body) = server.post(SCENARIO, false).await;
    assert_eq!(status, 200);
    assert!(body.contains("Will Survive") || body.contains("At Risk"));
    assert!(body.contains("<form"));

    // same row, same label
    let (_, first) = server.post(SCENARIO, true).await;
    let (_, second) = server.post(SCENARIO, true).await;
    assert_eq!(first, second);

    assert_eq!(server.shutdown().await, 0);
}

#[tokio::test]
async fn test_fixed_model_labels_and_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(age_threshold_config(dir.path())).await;

    let (status, body) = server.post(SCENARIO, true).await;
    assert_eq!(status, 200);
    assert!(body.contains("Will Survive"));
    assert!(!body.contains("<form"));

    let older = SCENARIO.replace("age=60", "age=80");
    let (_, body) = server.post(&older, true).await;
    assert!(body.contains("At Risk"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_input_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(age_threshold_config(dir.path())).await;

    let young = SCENARIO.replace("age=60", "age=10");
    let (status, body) = server.post(&young, false).await;
    assert_eq!(status, 200);
    assert!(body.contains("Error: Invalid input."));
    assert!(body.contains("age"));

    let missing = SCENARIO.replace("&smoking=No", "").replace("&time=115", "");
    let (status, body) = server.post(&missing, true).await;
    assert_eq!(status, 200);
    assert!(body.contains("Error: Invalid input."));

    let words = SCENARIO.replace("serum_sodium=137", "serum_sodium=high");
    let (status, body) = server.post(&words, true).await;
    assert_eq!(status, 200);
    assert!(body.contains("could not convert string to float"));

    // the server is still healthy afterwards
    let (status, body) = server.get("/healthz").await;
    assert_eq!((status, body.as_str()), (200, "ok"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_get_form_and_unknown_path() {
    let dir = tempfile::tempdir().unwrap();
    let server = TestServer::start(age_threshold_config(dir.path())).await;

    let (status, body) = server.get("/").await;
    assert_eq!(status, 200);
    assert!(body.contains("name=\"ejection_fraction\""));
    assert!(!body.contains("Prediction:"));

    let (status, _) = server.get("/model.pkl").await;
    assert_eq!(status, 404);

    server.shutdown().await;
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = age_threshold_config(dir.path());
    config.http.max_body_size = 64;
    let server = TestServer::start(config).await;

    let (status, _) = server.post(SCENARIO, false).await;
    assert_eq!(status, 413);

    server.shutdown().await;
}

#[test]
fn test_missing_artifacts_prevent_startup() {
    let mut config = base_config();
    config.model.model_path = "does/not/exist/model.json".into();
    let err = AppState::load(config).err().expect("load must fail");
    assert!(matches!(err, ArtifactError::Io { .. }));
}

#[test]
fn test_incompatible_artifact_prevents_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = age_threshold_config(dir.path());
    config.model.model_path = write_artifact(
        dir.path(),
        "short.json",
        r#"{"type":"logistic_regression","coef":[1.0, 2.0],"intercept":0.0}"#,
    );
    let err = AppState::load(config).err().expect("load must fail");
    assert!(matches!(err, ArtifactError::Incompatible { .. }));
}

#[test]
fn test_state_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arc<AppState>>();
}
