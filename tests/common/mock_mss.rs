//! In-process MSSP stand-in.
//!
//! Serves `POST /rest/service` on an ephemeral loopback port, records every
//! request and answers through a caller-supplied responder.

use serde_json::Value;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use warp::http::{HeaderMap, StatusCode};
use warp::hyper::body::Bytes;
use warp::Filter;

/// One request as received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    pub raw_body: String,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Name of the single root key of the request body.
    pub fn root_key(&self) -> Option<&str> {
        self.body.as_object()?.keys().next().map(String::as_str)
    }
}

/// Status and body returned by the mock.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

type Responder = dyn Fn(&RecordedRequest) -> MockReply + Send + Sync;

struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responder: Box<Responder>,
}

pub struct MockMss {
    addr: SocketAddr,
    state: Arc<MockState>,
    _shutdown: oneshot::Sender<()>,
}

impl MockMss {
    /// Start a mock answering every request through `responder`.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
    {
        let state = Arc::new(MockState {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        });

        let route = warp::path!("rest" / "service")
            .and(warp::post())
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .and(with_state(state.clone()))
            .and_then(handle_request);

        let (tx, rx) = oneshot::channel::<()>();
        let (addr, server) =
            warp::serve(route).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
                rx.await.ok();
            });
        tokio::spawn(server);

        Self {
            addr,
            state,
            _shutdown: tx,
        }
    }

    /// Start a mock that always returns the same JSON document.
    pub async fn fixed(response: Value) -> Self {
        Self::start(move |_| MockReply::json(&response)).await
    }

    pub fn url(&self) -> String {
        format!("http://{}/rest/service", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock received no request")
    }
}

fn with_state(
    state: Arc<MockState>,
) -> impl Filter<Extract = (Arc<MockState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn handle_request(
    headers: HeaderMap,
    body: Bytes,
    state: Arc<MockState>,
) -> Result<impl warp::Reply, Infallible> {
    let raw_body = String::from_utf8_lossy(&body).into_owned();
    let body = serde_json::from_str(&raw_body).unwrap_or(Value::Null);
    let request = RecordedRequest {
        headers,
        raw_body,
        body,
    };
    let reply = (state.responder)(&request);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(request);
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Ok(warp::reply::with_status(reply.body, status))
}
