use super::*;
use crate::net::api::PROFILE_ENDPOINT;
use crate::net::transport::Method;
use crate::test_helpers::Harness;
use futures::executor::block_on;
use serde_json::json;

fn profile_json() -> serde_json::Value {
    json!({"id": 3, "username": "ann", "email": "ann@example.com", "bio": "hi"})
}

#[test]
fn fetch_unwraps_data_envelope() {
    let h = Harness::new(Some("t"));
    h.transport.reply(Method::Get, PROFILE_ENDPOINT, 200, json!({"data": profile_json()}));
    let store = ProfileStore::new(h.session.client().clone());

    assert!(block_on(store.fetch_profile()));

    let state = store.snapshot();
    assert_eq!(state.profile.as_ref().map(|p| p.username.as_str()), Some("ann"));
    assert!(!state.is_loading);
}

#[test]
fn fetch_accepts_bare_profile() {
    let h = Harness::new(Some("t"));
    h.transport.reply(Method::Get, PROFILE_ENDPOINT, 200, profile_json());
    let store = ProfileStore::new(h.session.client().clone());
    assert!(block_on(store.fetch_profile()));
    assert_eq!(store.snapshot().profile.and_then(|p| p.bio).as_deref(), Some("hi"));
}

#[test]
fn failure_clears_profile_and_sets_error() {
    let h = Harness::new(Some("t"));
    h.transport.reply(Method::Get, PROFILE_ENDPOINT, 200, profile_json());
    h.transport.reply(Method::Get, PROFILE_ENDPOINT, 500, serde_json::Value::Null);
    let store = ProfileStore::new(h.session.client().clone());

    assert!(block_on(store.fetch_profile()));
    assert!(!block_on(store.fetch_profile()));

    let state = store.snapshot();
    assert_eq!(state.profile, None);
    assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
    assert!(!state.is_loading);
}
