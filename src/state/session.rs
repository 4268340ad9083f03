//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionContext`] owns `{user, token}` and keeps the durable token store
//! and the default `Authorization` header in lockstep with it. It is injected
//! into the HTTP pipeline (bearer header, forced logout) and read by the route
//! guard. [`SessionStore`] layers the async operations on top: login,
//! register, logout and current-user hydration.
//!
//! INVARIANTS
//! ==========
//! - `is_logged_in()` holds iff both user and token are present.
//! - [`SessionContext::set_auth_data`] is the only writer of the token; it
//!   writes memory, storage and header with no suspension in between.
//! - Token without user only exists while a current-user fetch is pending.
//! - A cancelled request never mutates the session.
//! - A current-user reply only applies to the token it was requested with.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use super::observable::Observable;
use crate::config::ClientConfig;
use crate::net::api;
use crate::net::client::{ApiClient, DefaultHeaders};
use crate::net::error::ApiError;
use crate::net::pipeline::{AUTHORIZATION, AuthSession, bearer};
use crate::net::transport::Transport;
use crate::net::types::{AuthResult, LoginCredentials, RegisterPayload, User};
use crate::util::notify::Notifier;
use crate::util::token_store::TokenStore;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";

const MIN_PASSWORD_LEN: usize = 6;

/// Coarse session phase derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    Authenticating,
    LoggedIn,
    /// Token present, user not yet loaded.
    Degraded,
}

/// Snapshot of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub(crate) loading_depth: u32,
}

impl SessionState {
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some() && self.token.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Authenticating
        } else if self.is_logged_in() {
            SessionPhase::LoggedIn
        } else if self.token.is_some() {
            SessionPhase::Degraded
        } else {
            SessionPhase::LoggedOut
        }
    }

    /// Token present but user not loaded yet.
    #[must_use]
    pub fn needs_user(&self) -> bool {
        self.token.is_some() && self.current_user.is_none()
    }
}

pub struct SessionContext {
    state: Observable<SessionState>,
    tokens: Arc<dyn TokenStore>,
    headers: Arc<DefaultHeaders>,
}

impl SessionContext {
    /// Restore the session from durable storage. A stored token is put back
    /// on the default headers; the user stays unloaded until hydration.
    pub fn new(tokens: Arc<dyn TokenStore>, headers: Arc<DefaultHeaders>) -> Self {
        let token = tokens.load();
        match &token {
            Some(token) => {
                log::debug!("restored session token from storage");
                headers.set(AUTHORIZATION, &bearer(token));
            }
            None => headers.remove(AUTHORIZATION),
        }
        Self {
            state: Observable::new(SessionState { token, ..SessionState::default() }),
            tokens,
            headers,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.get()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.with(|s| s.current_user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.with(SessionState::is_logged_in)
    }

    /// Observe every state change. Used to mirror the session into a signal.
    pub fn subscribe(&self, f: impl Fn(&SessionState) + Send + Sync + 'static) {
        self.state.subscribe(f);
    }

    /// Replace `{user, token}` together and clear the error.
    ///
    /// Storage and the default auth header follow the token: present means
    /// saved and `Bearer <token>`, absent means removed from both.
    pub fn set_auth_data(&self, user: Option<User>, token: Option<String>) {
        match &token {
            Some(token) => {
                self.tokens.save(token);
                self.headers.set(AUTHORIZATION, &bearer(token));
            }
            None => {
                self.tokens.clear();
                self.headers.remove(AUTHORIZATION);
            }
        }
        self.state.update(|s| {
            s.current_user = user;
            s.token = token;
            s.last_error = None;
        });
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.state.update(f);
    }

    fn set_error(&self, message: String) {
        self.update(|s| s.last_error = Some(message));
    }
}

impl AuthSession for SessionContext {
    fn token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }

    fn force_logout(&self) {
        let had_token = self.state.with(|s| s.token.is_some());
        if had_token {
            log::info!("forcing logout after unauthorized response");
        }
        self.set_auth_data(None, None);
        if had_token {
            self.set_error(SESSION_EXPIRED.to_owned());
        }
    }
}

/// Holds `is_loading` up for the lifetime of one operation, including when
/// its future is dropped midway.
struct LoadingGuard<'a> {
    context: &'a SessionContext,
}

impl<'a> LoadingGuard<'a> {
    fn begin(context: &'a SessionContext, clear_error: bool) -> Self {
        context.update(|s| {
            s.loading_depth += 1;
            s.is_loading = true;
            if clear_error {
                s.last_error = None;
            }
        });
        Self { context }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.context.update(|s| {
            s.loading_depth = s.loading_depth.saturating_sub(1);
            s.is_loading = s.loading_depth > 0;
        });
    }
}

type HydrationWaiters = Arc<Mutex<Option<Vec<oneshot::Sender<()>>>>>;

/// Releases everyone parked on an in-flight hydration.
struct HydrationDone<'a> {
    waiters: &'a Mutex<Option<Vec<oneshot::Sender<()>>>>,
}

impl Drop for HydrationDone<'_> {
    fn drop(&mut self) {
        let parked = self
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_default();
        for tx in parked {
            let _ = tx.send(());
        }
    }
}

/// Session operations. Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct SessionStore {
    context: Arc<SessionContext>,
    client: Arc<ApiClient>,
    hydration: HydrationWaiters,
}

impl SessionStore {
    pub fn new(context: Arc<SessionContext>, client: Arc<ApiClient>) -> Self {
        Self { context, client, hydration: Arc::new(Mutex::new(None)) }
    }

    /// Wire a session context and an HTTP client with the standard pipeline
    /// sharing one set of default headers.
    pub fn connect(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let headers = Arc::new(DefaultHeaders::new());
        let context = Arc::new(SessionContext::new(tokens, headers.clone()));
        let client = Arc::new(ApiClient::with_standard_pipeline(
            config,
            transport,
            headers,
            context.clone(),
            notifier,
        ));
        Self::new(context, client)
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn snapshot(&self) -> SessionState {
        self.context.snapshot()
    }

    pub fn is_logged_in(&self) -> bool {
        self.context.is_logged_in()
    }

    pub fn set_auth_data(&self, user: Option<User>, token: Option<String>) {
        self.context.set_auth_data(user, token);
    }

    /// Startup hydration: load the user for a stored token. Awaitable, and
    /// shared with any route guard that asks at the same time.
    pub async fn initialize(&self) {
        if self.context.snapshot().needs_user() {
            log::debug!("hydrating session from stored token");
        }
        self.ensure_hydrated().await;
    }

    /// Make sure a stored token has had its user fetched.
    ///
    /// Concurrent callers join the fetch already in flight instead of issuing
    /// a second one.
    pub async fn ensure_hydrated(&self) {
        if !self.context.snapshot().needs_user() {
            return;
        }
        let parked = {
            let mut slot = self.hydration.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.as_mut() {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                None => {
                    *slot = Some(Vec::new());
                    None
                }
            }
        };
        if let Some(rx) = parked {
            let _ = rx.await;
            return;
        }
        let _done = HydrationDone { waiters: &self.hydration };
        self.fetch_current_user().await;
    }

    /// Returns `true` on success. Failure clears the session and records
    /// `last_error`.
    pub async fn login(&self, credentials: &LoginCredentials) -> bool {
        if let Err(err) = validate_login(credentials) {
            self.context.set_error(err.message);
            return false;
        }
        let _loading = LoadingGuard::begin(&self.context, true);
        let outcome = api::login(&self.client, credentials).await;
        self.finish_auth(outcome, LOGIN_FAILED)
    }

    /// Returns `true` on success. Failure clears the session and records
    /// `last_error`.
    pub async fn register(&self, payload: &RegisterPayload) -> bool {
        if let Err(err) = validate_register(payload) {
            self.context.set_error(err.message);
            return false;
        }
        let _loading = LoadingGuard::begin(&self.context, true);
        let outcome = api::register(&self.client, payload).await;
        self.finish_auth(outcome, REGISTRATION_FAILED)
    }

    fn finish_auth(&self, outcome: Result<AuthResult, ApiError>, fallback: &str) -> bool {
        match outcome {
            Ok(AuthResult { user, token }) => {
                log::info!("signed in as user #{}", user.id);
                self.context.set_auth_data(Some(user), Some(token));
                true
            }
            Err(err) if err.is_cancelled() => false,
            Err(err) => {
                log::warn!("authentication failed: {err} ({:?})", err.kind);
                self.context.set_auth_data(None, None);
                self.context.set_error(err.user_message(fallback));
                false
            }
        }
    }

    /// Best-effort server logout, then clear the session. Idempotent.
    pub async fn logout(&self) {
        if self.context.token().is_some() {
            if let Err(err) = api::logout(&self.client).await {
                log::warn!("logout request failed (ignored): {err}");
            }
        }
        self.context.set_auth_data(None, None);
    }

    /// Reload the user for the current token. Without a token this only
    /// clears a stale user. A reply that arrives after the token changed
    /// (logout or another login meanwhile) is dropped.
    pub async fn fetch_current_user(&self) {
        if self.context.token().is_none() {
            if self.context.current_user().is_some() {
                self.context.set_auth_data(None, None);
            }
            return;
        }
        let sent_with = self.context.token();
        let _loading = LoadingGuard::begin(&self.context, false);
        let outcome = api::fetch_current_user(&self.client).await;
        if self.context.token() != sent_with {
            log::debug!("dropping current-user reply for a replaced token");
            return;
        }
        match outcome {
            Ok(user) => self.context.set_auth_data(Some(user), sent_with),
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                log::warn!("failed to fetch current user: {err}");
                self.context.set_auth_data(None, None);
                self.context.set_error(err.user_message(SESSION_EXPIRED));
            }
        }
    }
}

/// Client-side checks run before `POST /auth/login`.
///
/// # Errors
///
/// Returns a `Validation` [`ApiError`] naming the first problem.
pub fn validate_login(credentials: &LoginCredentials) -> Result<(), ApiError> {
    if credentials.identifier.trim().is_empty() {
        return Err(ApiError::validation("Enter your email or username."));
    }
    if credentials.password.is_empty() {
        return Err(ApiError::validation("Enter your password."));
    }
    Ok(())
}

/// Client-side checks run before `POST /auth/register`.
///
/// # Errors
///
/// Returns a `Validation` [`ApiError`] naming the first problem.
pub fn validate_register(payload: &RegisterPayload) -> Result<(), ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Enter a username."));
    }
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(ApiError::validation("Enter a valid email address."));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }
    Ok(())
}
