//! Scripted fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::channel::oneshot;

use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::net::types::User;
use crate::state::session::SessionStore;
use crate::util::notify::{Notification, Notifier};
use crate::util::token_store::{MemoryTokenStore, TokenStore};

// =========================================================================
// ScriptedTransport
// =========================================================================

type Reply = Result<HttpResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Hang,
    Gate(oneshot::Receiver<Reply>),
}

struct Route {
    method: Method,
    path: String,
    reply: Scripted,
}

/// Transport that answers from a queue of scripted replies.
///
/// Each reply is consumed by the first call whose method matches and whose
/// URL ends with the scripted path. Unscripted calls get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<VecDeque<Route>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, reply: Scripted) {
        self.routes.lock().unwrap().push_back(Route { method, path: path.to_owned(), reply });
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.push(method, path, Scripted::Ready(Ok(HttpResponse { status, body })));
    }

    pub fn fail(&self, method: Method, path: &str, err: TransportError) {
        self.push(method, path, Scripted::Ready(Err(err)));
    }

    /// Never settles; the call only ends if it is aborted.
    pub fn hang(&self, method: Method, path: &str) {
        self.push(method, path, Scripted::Hang);
    }

    /// Settles when the test sends on the returned channel.
    pub fn gate(&self, method: Method, path: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Scripted::Gate(rx));
        tx
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            let idx = routes
                .iter()
                .position(|r| r.method == request.method && request.url.ends_with(&r.path));
            idx.and_then(|i| routes.remove(i)).map(|r| r.reply)
        };
        match scripted {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Hang) => futures::future::pending().await,
            Some(Scripted::Gate(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_owned()))),
            None => Ok(HttpResponse { status: 404, body: r#"{"detail":"no scripted reply"}"#.to_owned() }),
        }
    }
}

// =========================================================================
// RecordingNotifier
// =========================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn user(id: i64) -> User {
    User {
        id,
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        nickname: None,
        avatar_url: None,
        is_active: true,
        is_superuser: false,
        roles: Vec::new(),
        permissions: Vec::new(),
    }
}

pub fn user_json(id: i64) -> serde_json::Value {
    serde_json::to_value(user(id)).unwrap()
}

/// A fully wired session over scripted fakes.
pub struct Harness {
    pub session: SessionStore,
    pub transport: Arc<ScriptedTransport>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Wire a session whose durable store starts with `stored_token`.
    pub fn new(stored_token: Option<&str>) -> Self {
        let transport = ScriptedTransport::new();
        let tokens = Arc::new(MemoryTokenStore::new());
        if let Some(token) = stored_token {
            tokens.save(token);
        }
        let notifier = RecordingNotifier::new();
        let session = SessionStore::connect(
            ClientConfig::default(),
            transport.clone(),
            tokens.clone(),
            notifier.clone(),
        );
        Self { session, transport, tokens, notifier }
    }

    pub fn auth_header(&self) -> Option<String> {
        self.session
            .client()
            .default_headers()
            .get(crate::net::pipeline::AUTHORIZATION)
    }
}
