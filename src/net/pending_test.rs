use super::*;
use crate::net::transport::Method;
use futures::future::{Abortable, Aborted};
use std::collections::BTreeMap;
use std::time::Duration;

fn request(method: Method, url: &str, body: Option<serde_json::Value>) -> HttpRequest {
    HttpRequest {
        method,
        url: url.to_owned(),
        params: Vec::new(),
        headers: BTreeMap::new(),
        body,
        timeout: Duration::from_secs(1),
    }
}

// =============================================================
// fingerprint
// =============================================================

#[test]
fn fingerprint_is_stable_for_identical_requests() {
    let a = request(Method::Get, "/api/v1/todos/", None);
    let b = request(Method::Get, "/api/v1/todos/", None);
    assert_eq!(fingerprint(&a), fingerprint(&b));
}

#[test]
fn fingerprint_ignores_headers() {
    let a = request(Method::Get, "/api/v1/todos/", None);
    let mut b = a.clone();
    b.headers.insert("Authorization".to_owned(), "Bearer x".to_owned());
    assert_eq!(fingerprint(&a), fingerprint(&b));
}

#[test]
fn fingerprint_differs_by_method_params_and_body() {
    let base = request(Method::Get, "/api/v1/todos/", None);
    let post = request(Method::Post, "/api/v1/todos/", None);
    let mut with_params = base.clone();
    with_params.params.push(("page".to_owned(), "2".to_owned()));
    let with_body = request(Method::Get, "/api/v1/todos/", Some(serde_json::json!({"a": 1})));

    let fp = fingerprint(&base);
    assert_ne!(fp, fingerprint(&post));
    assert_ne!(fp, fingerprint(&with_params));
    assert_ne!(fp, fingerprint(&with_body));
}

// =============================================================
// register / release
// =============================================================

#[test]
fn register_second_aborts_first() {
    let pending = PendingRequests::new();
    let (_first, first_reg) = pending.register("GET_/todos".to_owned());
    let (_second, second_reg) = pending.register("GET_/todos".to_owned());

    let first = futures::executor::block_on(Abortable::new(futures::future::pending::<()>(), first_reg));
    assert_eq!(first, Err(Aborted));

    let second = futures::executor::block_on(Abortable::new(futures::future::ready(7), second_reg));
    assert_eq!(second, Ok(7));
    assert_eq!(pending.len(), 1);
}

#[test]
fn release_by_superseded_ticket_keeps_successor() {
    let pending = PendingRequests::new();
    let (first, _r1) = pending.register("fp".to_owned());
    let (second, _r2) = pending.register("fp".to_owned());

    assert!(!pending.release(&first));
    assert!(pending.contains("fp"));
    assert!(pending.release(&second));
    assert!(pending.is_empty());
}

#[test]
fn distinct_fingerprints_do_not_interfere() {
    let pending = PendingRequests::new();
    let (a, _ra) = pending.register("a".to_owned());
    let (b, _rb) = pending.register("b".to_owned());
    assert_eq!(pending.len(), 2);
    assert!(pending.release(&a));
    assert!(pending.contains("b"));
    assert!(pending.release(&b));
}

#[test]
fn release_twice_is_harmless() {
    let pending = PendingRequests::new();
    let (ticket, _reg) = pending.register("fp".to_owned());
    assert!(pending.release(&ticket));
    assert!(!pending.release(&ticket));
}
