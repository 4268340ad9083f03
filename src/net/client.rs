//! Configured REST client: base URL, default headers, stage pipeline.
//!
//! ERROR HANDLING
//! ==============
//! Verbs return `Result<T, ApiError>`. Classification happens once in
//! [`ApiClient::execute`]; response stages see the classified outcome before
//! the caller does.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{Abortable, Aborted};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiErrorKind};
use super::pending::PendingRequests;
use super::pipeline::{
    AuthSession, BearerAuth, CallContext, Dedup, ForceLogout, NotifyErrors, RequestStage, ResponseStage,
};
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::config::ClientConfig;
use crate::util::notify::Notifier;

/// Headers merged into every request before per-call overrides.
pub struct DefaultHeaders {
    headers: Mutex<BTreeMap<String, String>>,
}

impl Default for DefaultHeaders {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        Self { headers: Mutex::new(headers) }
    }
}

impl DefaultHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: &str, value: &str) {
        let mut headers = self.headers.lock().unwrap_or_else(PoisonError::into_inner);
        headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        headers.insert(name.to_owned(), value.to_owned());
    }

    pub fn remove(&self, name: &str) {
        self.headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|k, _| !k.eq_ignore_ascii_case(name));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.headers.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Per-call knobs.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub allow_duplicate: bool,
    pub quiet: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Let this call run alongside an identical in-flight one.
    #[must_use]
    pub fn allow_duplicate(mut self) -> Self {
        self.allow_duplicate = true;
        self
    }

    /// Do not emit error notifications for this call.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

pub struct ApiClient {
    config: ClientConfig,
    defaults: Arc<DefaultHeaders>,
    transport: Arc<dyn Transport>,
    pending: Arc<PendingRequests>,
    request_stages: Vec<Arc<dyn RequestStage>>,
    response_stages: Vec<Arc<dyn ResponseStage>>,
}

impl ApiClient {
    /// Client with an empty pipeline.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, defaults: Arc<DefaultHeaders>) -> Self {
        Self {
            config,
            defaults,
            transport,
            pending: Arc::new(PendingRequests::new()),
            request_stages: Vec::new(),
            response_stages: Vec::new(),
        }
    }

    /// Client with bearer auth, deduplication, forced logout and error
    /// notifications installed in their standard order.
    pub fn with_standard_pipeline(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        defaults: Arc<DefaultHeaders>,
        session: Arc<dyn AuthSession>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let client = Self::new(config, transport, defaults);
        let dedup = Arc::new(Dedup::new(client.pending.clone()));
        client
            .request_stage(Arc::new(BearerAuth::new(session.clone())))
            .request_stage(dedup.clone())
            .response_stage(dedup)
            .response_stage(Arc::new(ForceLogout::new(session)))
            .response_stage(Arc::new(NotifyErrors::new(notifier)))
    }

    #[must_use]
    pub fn request_stage(mut self, stage: Arc<dyn RequestStage>) -> Self {
        self.request_stages.push(stage);
        self
    }

    #[must_use]
    pub fn response_stage(mut self, stage: Arc<dyn ResponseStage>) -> Self {
        self.response_stages.push(stage);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn default_headers(&self) -> &Arc<DefaultHeaders> {
        &self.defaults
    }

    pub fn pending(&self) -> &Arc<PendingRequests> {
        &self.pending
    }

    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failed or undecodable call.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(Method::Get, path, None, options).await
    }

    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failed or undecodable call.
    pub async fn post<B, T>(&self, path: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.send(Method::Post, path, Some(body), options).await
    }

    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failed or undecodable call.
    pub async fn put<B, T>(&self, path: &str, body: &B, options: RequestOptions) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode_body(body)?;
        self.send(Method::Put, path, Some(body), options).await
    }

    /// # Errors
    ///
    /// Returns the classified [`ApiError`] for any failed or undecodable call.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.send(Method::Delete, path, None, options).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let response = self.execute(method, path, body, options).await?;
        decode_body(&response.body).inspect_err(|err| {
            log::warn!("{} {path}: undecodable response body: {err:?}", method.as_str());
        })
    }

    /// Run one call through the full pipeline and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] after every response stage ran.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(method, path, body, &options);
        let mut call = CallContext::new(request, options.allow_duplicate, options.quiet);

        let prepared = self
            .request_stages
            .iter()
            .try_for_each(|stage| stage.on_request(&mut call));
        let outcome = match prepared {
            Ok(()) => self.dispatch(&mut call).await,
            Err(err) => Err(err),
        };

        self.response_stages
            .iter()
            .fold(outcome, |outcome, stage| stage.on_response(&call, outcome))
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: &RequestOptions,
    ) -> HttpRequest {
        let mut headers = self.defaults.snapshot();
        for (name, value) in &options.headers {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }
        HttpRequest {
            method,
            url: self.config.endpoint(path),
            params: options.params.clone(),
            headers,
            body,
            timeout: self.config.request_timeout,
        }
    }

    async fn dispatch(&self, call: &mut CallContext) -> Result<HttpResponse, ApiError> {
        let sent = match call.take_abort() {
            Some(registration) => match Abortable::new(self.transport.send(&call.request), registration).await {
                Ok(sent) => sent,
                Err(Aborted) => return Err(ApiError::cancelled()),
            },
            None => self.transport.send(&call.request).await,
        };
        let response = sent.map_err(ApiError::from)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::validation("Request body could not be encoded").with_cause(e.to_string()))
}

/// Decode a 2xx body. An empty body decodes as JSON `null`, so `()` and
/// `Option<_>` targets accept `204 No Content`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let raw = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(raw).map_err(|e| ApiError::new(ApiErrorKind::Unknown).with_cause(e.to_string()))
}
