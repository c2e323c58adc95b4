//! Minimal HTTP/1.1 server for exercising the discovery clients
//!
//! Answers each connection with one canned response and closes it. Requests
//! that match no route get a GitHub-style 404.

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A request as the stub received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query, e.g. `/orgs/acme/repos?page=1`
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query_pairs(&self) -> Vec<&str> {
        self.target
            .split_once('?')
            .map(|(_, query)| query.split('&').collect())
            .unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
struct Route {
    path: String,
    query: Vec<String>,
    status: u16,
    body: String,
}

impl Route {
    fn matches(&self, request: &RecordedRequest) -> bool {
        let pairs = request.query_pairs();
        request.path() == self.path && self.query.iter().all(|q| pairs.contains(&q.as_str()))
    }
}

#[derive(Default)]
struct State {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
}

pub struct HttpStub {
    base_url: String,
    state: Arc<Mutex<State>>,
    task: JoinHandle<()>,
}

impl HttpStub {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(Mutex::new(State::default()));

        let accept_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&accept_state)));
            }
        });

        Self {
            base_url,
            state,
            task,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `GET path` carrying every `key=value` pair in `query`
    pub fn route(&self, path: &str, query: &[&str], status: u16, body: impl Into<String>) {
        self.state.lock().unwrap().routes.push(Route {
            path: path.to_string(),
            query: query.iter().map(|q| q.to_string()).collect(),
            status,
            body: body.into(),
        });
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(stream: TcpStream, state: Arc<Mutex<State>>) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
        return;
    }
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let request = RecordedRequest { target, headers };
    let (status, body) = {
        let mut state = state.lock().unwrap();
        let reply = state
            .routes
            .iter()
            .find(|route| route.matches(&request))
            .map(|route| (route.status, route.body.clone()))
            .unwrap_or((404, r#"{"message": "Not Found"}"#.to_string()));
        state.requests.push(request);
        reply
    };

    let response = format!(
        "HTTP/1.1 {} Stub\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
