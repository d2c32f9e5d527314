//! Minimal HTTP/1.1 stub served from a local `TcpListener`.
//!
//! Each connection carries one request; canned responses are served in
//! order and every request is recorded for assertions. A response bound to a
//! path with `on` is only served to a request for that path.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
    path: Option<String>,
}

impl StubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), headers: Vec::new(), path: None }
    }

    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Only answer requests whose path (including query) equals `path`.
    pub fn on(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    fn matches(&self, path: &str) -> bool {
        self.path.as_deref().is_none_or(|p| p == path)
    }

    fn render(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            reason(self.status),
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener =
            TcpListener::bind(("127.0.0.1", 0)).await.expect("failed to bind stub listener");
        let port = listener.local_addr().expect("failed to read stub listener address").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(Mutex::new(VecDeque::from(responses)));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn({
            let requests = requests.clone();
            async move {
                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        incoming = listener.accept() => {
                            let Ok((stream, _peer_addr)) = incoming else {
                                break;
                            };
                            let requests = requests.clone();
                            let responses = responses.clone();
                            tokio::spawn(async move {
                                let _ = serve_one(stream, requests, responses).await;
                            });
                        }
                    }
                }
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

async fn serve_one(
    mut stream: TcpStream,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<StubResponse>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

    let response = {
        let mut responses = responses.lock();
        responses
            .iter()
            .position(|r| r.matches(&path))
            .and_then(|idx| responses.remove(idx))
            .unwrap_or_else(|| StubResponse::new(500, "no stub response left"))
    };
    requests.lock().push(RecordedRequest { method, path, body });

    stream.write_all(&response.render()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// A local address with nothing listening on it.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("failed to bind");
    let port = listener.local_addr().expect("failed to read address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
