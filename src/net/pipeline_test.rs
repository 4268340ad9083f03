use super::*;
use crate::net::transport::Method;
use crate::test_helpers::RecordingNotifier;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct FakeSession {
    token: Mutex<Option<String>>,
    logouts: Mutex<u32>,
}

impl FakeSession {
    fn with_token(token: &str) -> Arc<Self> {
        let session = Self::default();
        *session.token.lock().unwrap() = Some(token.to_owned());
        Arc::new(session)
    }

    fn logouts(&self) -> u32 {
        *self.logouts.lock().unwrap()
    }
}

impl AuthSession for FakeSession {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn force_logout(&self) {
        *self.logouts.lock().unwrap() += 1;
        *self.token.lock().unwrap() = None;
    }
}

fn call(url: &str) -> CallContext {
    let request = HttpRequest {
        method: Method::Get,
        url: url.to_owned(),
        params: Vec::new(),
        headers: BTreeMap::new(),
        body: None,
        timeout: Duration::from_secs(1),
    };
    CallContext::new(request, false, false)
}

fn ok() -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse { status: 200, body: String::new() })
}

// =============================================================
// BearerAuth
// =============================================================

#[test]
fn bearer_replaces_stale_header_of_any_case() {
    let stage = BearerAuth::new(FakeSession::with_token("fresh"));
    let mut ctx = call("/a");
    ctx.request.headers.insert("authorization".to_owned(), "Bearer stale".to_owned());

    stage.on_request(&mut ctx).unwrap();

    assert_eq!(ctx.request.headers.len(), 1);
    assert_eq!(ctx.request.header(AUTHORIZATION), Some("Bearer fresh"));
}

#[test]
fn bearer_without_token_leaves_headers_alone() {
    let stage = BearerAuth::new(Arc::new(FakeSession::default()));
    let mut ctx = call("/a");
    stage.on_request(&mut ctx).unwrap();
    assert!(ctx.request.headers.is_empty());
}

// =============================================================
// Dedup
// =============================================================

#[test]
fn dedup_claims_and_releases_slot() {
    let pending = Arc::new(PendingRequests::new());
    let stage = Dedup::new(pending.clone());
    let mut ctx = call("/a");

    RequestStage::on_request(&stage, &mut ctx).unwrap();
    assert!(ctx.ticket().is_some());
    assert!(ctx.take_abort().is_some());
    assert_eq!(pending.len(), 1);

    assert!(ResponseStage::on_response(&stage, &ctx, ok()).is_ok());
    assert!(pending.is_empty());
}

#[test]
fn dedup_skips_calls_allowing_duplicates() {
    let pending = Arc::new(PendingRequests::new());
    let stage = Dedup::new(pending.clone());
    let mut ctx = call("/a");
    ctx.allow_duplicate = true;

    RequestStage::on_request(&stage, &mut ctx).unwrap();

    assert!(ctx.ticket().is_none());
    assert!(ctx.take_abort().is_none());
    assert!(pending.is_empty());
}

#[test]
fn dropped_call_releases_slot() {
    let pending = Arc::new(PendingRequests::new());
    let stage = Dedup::new(pending.clone());
    let mut ctx = call("/a");

    RequestStage::on_request(&stage, &mut ctx).unwrap();
    assert_eq!(pending.len(), 1);

    drop(ctx);
    assert!(pending.is_empty());
}

#[test]
fn late_release_keeps_successor_slot() {
    let pending = Arc::new(PendingRequests::new());
    let stage = Dedup::new(pending.clone());
    let mut first = call("/a");
    let mut second = call("/a");

    RequestStage::on_request(&stage, &mut first).unwrap();
    RequestStage::on_request(&stage, &mut second).unwrap();
    let _ = ResponseStage::on_response(&stage, &first, Err(ApiError::cancelled()));

    assert_eq!(pending.len(), 1);
}

// =============================================================
// ForceLogout
// =============================================================

#[test]
fn force_logout_only_on_unauthorized() {
    let session = FakeSession::with_token("t");
    let stage = ForceLogout::new(session.clone());
    let ctx = call("/a");

    let _ = stage.on_response(&ctx, Err(ApiError::new(ApiErrorKind::Forbidden)));
    let _ = stage.on_response(&ctx, ok());
    assert_eq!(session.logouts(), 0);

    let out = stage.on_response(&ctx, Err(ApiError::from_response(401, "")));
    assert_eq!(out.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert_eq!(session.logouts(), 1);
    assert_eq!(session.token(), None);
}

#[test]
fn force_logout_ignores_reply_for_replaced_token() {
    let session = FakeSession::with_token("fresh");
    let stage = ForceLogout::new(session.clone());
    let mut ctx = call("/auth/me");
    ctx.request.headers.insert(AUTHORIZATION.to_owned(), bearer("stale"));

    let out = stage.on_response(&ctx, Err(ApiError::from_response(401, "")));

    assert_eq!(out.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert_eq!(session.logouts(), 0);
    assert_eq!(session.token().as_deref(), Some("fresh"));
}

#[test]
fn force_logout_applies_when_sent_token_is_live() {
    let session = FakeSession::with_token("t");
    let stage = ForceLogout::new(session.clone());
    let mut ctx = call("/todos/");
    ctx.request.headers.insert(AUTHORIZATION.to_owned(), bearer("t"));

    let _ = stage.on_response(&ctx, Err(ApiError::from_response(401, "")));

    assert_eq!(session.logouts(), 1);
}

// =============================================================
// NotifyErrors
// =============================================================

#[test]
fn notify_reports_failures_with_kind_title() {
    let notifier = RecordingNotifier::new();
    let stage = NotifyErrors::new(notifier.clone());

    let _ = stage.on_response(&call("/a"), Err(ApiError::from_response(500, r#"{"message":"db down"}"#)));

    let seen = notifier.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Request failed");
    assert_eq!(seen[0].message, "Internal server error");
}

#[test]
fn notify_skips_cancelled_quiet_and_success() {
    let notifier = RecordingNotifier::new();
    let stage = NotifyErrors::new(notifier.clone());
    let mut quiet = call("/a");
    quiet.quiet = true;

    let _ = stage.on_response(&call("/a"), Err(ApiError::cancelled()));
    let _ = stage.on_response(&quiet, Err(ApiError::new(ApiErrorKind::ServerError)));
    let _ = stage.on_response(&call("/a"), ok());

    assert!(notifier.seen().is_empty());
}

#[test]
fn bearer_value_has_scheme_prefix() {
    assert_eq!(bearer("abc"), "Bearer abc");
}
