//! Common test utilities and mocks

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use spgrid_client::{ClientError, ClientResult, ProcedureTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

/// Transport that answers every call with a fixed reply and records bodies.
pub struct MockTransport {
    pub reply: Option<Value>,
    /// Every body posted, in call order
    pub log: Mutex<Vec<(Url, Value)>>,
}

impl MockTransport {
    pub fn replying(reply: Value) -> Self {
        Self {
            reply: Some(reply),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Url, Value)> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl ProcedureTransport for MockTransport {
    async fn post_json(&self, endpoint: &Url, body: &Value) -> ClientResult<Value> {
        self.log.lock().push((endpoint.clone(), body.clone()));
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ClientError::Request("connection refused".into())),
        }
    }
}

/// One HTTP request as the server saw it
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    /// Header lines, names lower-cased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Serve `connections` requests on 127.0.0.1 with a fixed raw HTTP reply.
///
/// Returns the endpoint URL and a handle yielding the captured requests.
pub async fn serve_http(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
    connections: usize,
) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let mut captured = Vec::with_capacity(connections);
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().await.expect("accept");
            captured.push(read_request(&mut socket).await);

            let reply = format!(
                "{}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.expect("write reply");
            let _ = socket.shutdown().await;
        }
        captured
    });

    (format!("http://{}/api/exec", addr), handle)
}

async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.expect("read request");
        assert!(n > 0, "connection closed before headers ended");
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.expect("read body");
        assert!(n > 0, "connection closed before body ended");
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(length);

    CapturedRequest {
        request_line,
        headers,
        body,
    }
}
