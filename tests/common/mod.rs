//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

/// One upload received by the mock aggregator.
#[derive(Debug, Clone)]
pub struct Upload {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

type Uploads = Arc<Mutex<Vec<Upload>>>;

/// A mock aggregator that records every request and answers with a fixed status.
pub struct MockAggregator {
    pub addr: SocketAddr,
    uploads: Uploads,
}

#[allow(dead_code)]
impl MockAggregator {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> url::Url {
        url::Url::parse(&format!("{}{}", self.base_url(), path)).unwrap()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

/// Start a mock aggregator on an ephemeral port.
pub async fn start_aggregator(status: StatusCode) -> MockAggregator {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let uploads: Uploads = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .fallback(record_upload)
        .with_state((uploads.clone(), status));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockAggregator { addr, uploads }
}

async fn record_upload(
    State((uploads, status)): State<(Uploads, StatusCode)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    uploads.lock().unwrap().push(Upload {
        method,
        path: uri.path().to_string(),
        content_type,
        body: body.to_vec(),
    });

    let reply = if status.is_success() { "ok" } else { "rejected by aggregator" };
    (status, reply)
}

/// Write a result file and return its path.
#[allow(dead_code)]
pub fn write_result(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
