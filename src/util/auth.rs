//! Route guard: session-aware navigation decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route component shares one redirect policy. Protected routes send
//! signed-out visitors to `/login?redirect=<path>`; guest-only routes send
//! signed-in users home. A stored token whose user is not loaded yet is
//! resolved first, so a page reload never decides on pre-hydration state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{SessionState, SessionStore};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const HOME_PATH: &str = "/";
pub const TODOS_PATH: &str = "/todos";
pub const PROFILE_PATH: &str = "/profile";

const REDIRECT_PARAM: &str = "redirect";

/// Authentication requirements declared by a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub guest_only: bool,
}

impl RouteMeta {
    pub const PUBLIC: Self = Self { requires_auth: false, guest_only: false };
    pub const AUTHENTICATED: Self = Self { requires_auth: true, guest_only: false };
    pub const GUEST_ONLY: Self = Self { requires_auth: false, guest_only: true };
}

/// Metadata for the app's route table, keyed by pathname.
#[must_use]
pub fn route_meta(path: &str) -> RouteMeta {
    let path = path.trim_end_matches('/');
    match path {
        LOGIN_PATH | REGISTER_PATH => RouteMeta::GUEST_ONLY,
        TODOS_PATH | PROFILE_PATH => RouteMeta::AUTHENTICATED,
        _ if path.starts_with("/todos/") => RouteMeta::AUTHENTICATED,
        _ => RouteMeta::PUBLIC,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decide on a navigation to `target` (path plus query) from a settled
/// session snapshot.
///
/// A signed-in user leaving a guest-only page goes home, or to the page the
/// login was started from when `target` carries a `redirect` query.
#[must_use]
pub fn decide(state: &SessionState, target: &str, meta: RouteMeta) -> GuardDecision {
    let logged_in = state.is_logged_in();
    if meta.requires_auth && !logged_in {
        GuardDecision::Redirect(login_redirect(target))
    } else if meta.guest_only && logged_in {
        let query = target.split_once('?').map_or("", |(_, q)| q);
        GuardDecision::Redirect(post_login_target(redirect_param(query).as_deref()))
    } else {
        GuardDecision::Allow
    }
}

/// Path plus query string as the user sees it.
#[must_use]
pub fn navigation_target(path: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { path.to_owned() } else { format!("{path}?{search}") }
}

/// `/login?redirect=<target>` with the target percent-encoded.
#[must_use]
pub fn login_redirect(target: &str) -> String {
    format!("{LOGIN_PATH}?{REDIRECT_PARAM}={}", urlencoding::encode(target))
}

/// Decoded `redirect` value from a query string (`?a=b&redirect=...`).
#[must_use]
pub fn redirect_param(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == REDIRECT_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(std::borrow::Cow::into_owned)
}

/// Where to go after a successful login. Only app-relative paths are
/// honored; anything else falls back to home.
#[must_use]
pub fn post_login_target(redirect: Option<&str>) -> String {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_owned()
        }
        _ => HOME_PATH.to_owned(),
    }
}

/// Resolve pending hydration, then decide.
pub async fn guard_navigation(session: &SessionStore, target: &str, meta: RouteMeta) -> GuardDecision {
    session.ensure_hydrated().await;
    decide(&session.snapshot(), target, meta)
}

/// Re-run the guard whenever the location or the session changes, and
/// navigate (replacing history) when it redirects.
pub fn install_route_guard<F>(session: SessionStore, state: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = leptos_router::hooks::use_location();
    let (pathname, search) = (location.pathname, location.search);
    Effect::new(move || {
        let path = pathname.get();
        let target = navigation_target(&path, &search.get());
        let meta = route_meta(&path);
        let snapshot = state.get();

        if !snapshot.needs_user() {
            if let GuardDecision::Redirect(to) = decide(&snapshot, &target, meta) {
                log::debug!("guard redirect {target} -> {to}");
                navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
            return;
        }

        let session = session.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            let decision = guard_navigation(&session, &target, meta).await;
            if pathname.get_untracked() != path {
                return;
            }
            if let GuardDecision::Redirect(to) = decision {
                log::debug!("guard redirect after hydration {target} -> {to}");
                navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
        });
    });
}
