//! Ordered request/response stages wrapped around every API call.
//!
//! DESIGN
//! ======
//! Cross-cutting concerns are explicit stage objects instead of library
//! hooks. Request stages run in order and may rewrite the request or
//! short-circuit with an [`ApiError`]. Response stages always run, in order,
//! on the classified outcome, including short-circuited ones, so registry
//! cleanup cannot be skipped.
//!
//! Standard order:
//! 1. [`BearerAuth`] attaches `Authorization` from the live session.
//! 2. [`Dedup`] cancels a matching in-flight call and claims its slot.
//! 3. [`Dedup`] (response side) releases the slot.
//! 4. [`ForceLogout`] clears the session on `Unauthorized`, unless the call
//!    was sent with a token the session has since replaced.
//! 5. [`NotifyErrors`] surfaces everything except `Cancelled`.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::sync::Arc;

use futures::future::AbortRegistration;

use super::error::{ApiError, ApiErrorKind};
use super::pending::{Claim, PendingRequests, Ticket, fingerprint};
use super::transport::{HttpRequest, HttpResponse};
use crate::util::notify::{Notification, Notifier};

pub const AUTHORIZATION: &str = "Authorization";

#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Everything the stages know about one call.
pub struct CallContext {
    pub request: HttpRequest,
    /// Skip deduplication for this call.
    pub allow_duplicate: bool,
    /// Suppress user-facing error notifications for this call.
    pub quiet: bool,
    /// Registry slot claimed by [`Dedup`], if any.
    claim: Option<Claim>,
    abort: Option<AbortRegistration>,
}

impl CallContext {
    #[must_use]
    pub fn new(request: HttpRequest, allow_duplicate: bool, quiet: bool) -> Self {
        Self { request, allow_duplicate, quiet, claim: None, abort: None }
    }

    #[must_use]
    pub fn ticket(&self) -> Option<&Ticket> {
        self.claim.as_ref().map(Claim::ticket)
    }

    pub(crate) fn take_abort(&mut self) -> Option<AbortRegistration> {
        self.abort.take()
    }
}

pub trait RequestStage: Send + Sync {
    /// # Errors
    ///
    /// Returning an error skips the transport; response stages still run.
    fn on_request(&self, call: &mut CallContext) -> Result<(), ApiError>;
}

pub trait ResponseStage: Send + Sync {
    /// # Errors
    ///
    /// Passes through or replaces the failure of the call.
    fn on_response(
        &self,
        call: &CallContext,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpResponse, ApiError>;
}

/// What the pipeline needs from the session: the live token and a way to
/// drop it when the server rejects it.
pub trait AuthSession: Send + Sync {
    fn token(&self) -> Option<String>;
    fn force_logout(&self);
}

pub struct BearerAuth {
    session: Arc<dyn AuthSession>,
}

impl BearerAuth {
    pub fn new(session: Arc<dyn AuthSession>) -> Self {
        Self { session }
    }
}

impl RequestStage for BearerAuth {
    fn on_request(&self, call: &mut CallContext) -> Result<(), ApiError> {
        if let Some(token) = self.session.token() {
            call.request
                .headers
                .retain(|k, _| !k.eq_ignore_ascii_case(AUTHORIZATION));
            call.request.headers.insert(AUTHORIZATION.to_owned(), bearer(&token));
        }
        Ok(())
    }
}

pub struct Dedup {
    pending: Arc<PendingRequests>,
}

impl Dedup {
    pub fn new(pending: Arc<PendingRequests>) -> Self {
        Self { pending }
    }
}

impl RequestStage for Dedup {
    fn on_request(&self, call: &mut CallContext) -> Result<(), ApiError> {
        if call.allow_duplicate {
            return Ok(());
        }
        let (ticket, registration) = self.pending.register(fingerprint(&call.request));
        call.claim = Some(Claim::new(self.pending.clone(), ticket));
        call.abort = Some(registration);
        Ok(())
    }
}

impl ResponseStage for Dedup {
    fn on_response(
        &self,
        call: &CallContext,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpResponse, ApiError> {
        if let Some(claim) = &call.claim {
            claim.release();
        }
        outcome
    }
}

pub struct ForceLogout {
    session: Arc<dyn AuthSession>,
}

impl ForceLogout {
    pub fn new(session: Arc<dyn AuthSession>) -> Self {
        Self { session }
    }
}

impl ResponseStage for ForceLogout {
    fn on_response(
        &self,
        call: &CallContext,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpResponse, ApiError> {
        if let Err(err) = &outcome
            && err.kind == ApiErrorKind::Unauthorized
        {
            if let Some(sent) = call.request.header(AUTHORIZATION)
                && self.session.token().is_none_or(|live| bearer(&live) != sent)
            {
                log::debug!("ignoring unauthorized reply for a replaced token");
                return outcome;
            }
            log::warn!(
                "{} {} rejected as unauthorized; clearing session",
                call.request.method.as_str(),
                call.request.url
            );
            self.session.force_logout();
        }
        outcome
    }
}

pub struct NotifyErrors {
    notifier: Arc<dyn Notifier>,
}

impl NotifyErrors {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

impl ResponseStage for NotifyErrors {
    fn on_response(
        &self,
        call: &CallContext,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Result<HttpResponse, ApiError> {
        if let Err(err) = &outcome {
            if err.is_cancelled() {
                log::debug!("{} {} cancelled", call.request.method.as_str(), call.request.url);
            } else if !call.quiet {
                self.notifier
                    .notify(Notification::error(err.kind.title(), err.message.clone()));
            }
        }
        outcome
    }
}
