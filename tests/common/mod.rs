//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use rta_gateway::audit::{AuditRecord, AuditSink};
use rta_gateway::auth::{AuthSnapshot, AuthStore};
use rta_gateway::{GatewayConfig, HttpServer, Shutdown};

/// Audit sink that keeps records in memory for assertions.
#[derive(Default)]
pub struct MemorySink(Mutex<Vec<serde_json::Value>>);

impl MemorySink {
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.0.lock().unwrap().clone()
    }
}

impl AuditSink for MemorySink {
    fn append(&self, record: &AuditRecord) {
        self.0
            .lock()
            .unwrap()
            .push(serde_json::to_value(record).unwrap());
    }
}

/// Everything the mock upstream saw for one request.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub host: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: u16,
    body: &'static str,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct MockUpstream {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockUpstream {
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock upstream that captures every request and returns a fixed
/// response carrying an `x-upstream-marker` header.
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body,
        requests: requests.clone(),
    };
    let app = Router::new().fallback(capture).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, requests }
}

async fn capture(State(state): State<MockState>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let host = request
        .headers()
        .get("host")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let headers = request
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let body = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    state.requests.lock().unwrap().push(CapturedRequest {
        method,
        path,
        host,
        headers,
        body,
    });

    Response::builder()
        .status(state.status)
        .header("x-upstream-marker", "rta")
        .body(Body::from(state.body))
        .unwrap()
}

/// A gateway instance running on an ephemeral port with an in-memory audit
/// sink and the default allow list.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub sink: Arc<MemorySink>,
    pub auth: AuthStore,
    pub shutdown: Shutdown,
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let sink = Arc::new(MemorySink::default());
    let auth = AuthStore::new(AuthSnapshot::default_allowlist());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&config, auth.clone(), sink.clone());
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        addr,
        sink,
        auth,
        shutdown,
    }
}
