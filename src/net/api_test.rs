use super::*;
use crate::config::ClientConfig;
use crate::net::client::DefaultHeaders;
use crate::net::transport::Method;
use crate::test_helpers::{ScriptedTransport, user_json};
use futures::executor::block_on;
use std::sync::Arc;

fn bare_client(transport: Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(ClientConfig::default(), transport, Arc::new(DefaultHeaders::new()))
}

#[test]
fn todo_endpoint_formats_expected_path() {
    assert_eq!(todo_endpoint(12), "/todos/12");
}

#[test]
fn login_posts_canonical_body_to_login_endpoint() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Post, LOGIN_ENDPOINT, 200, serde_json::json!({"user": user_json(1), "token": "t"}));
    let client = bare_client(transport.clone());

    let creds = LoginCredentials { identifier: "a@b.com".to_owned(), password: "secret".to_owned() };
    let result = block_on(login(&client, &creds)).unwrap();

    assert_eq!(result.token, "t");
    let call = &transport.calls()[0];
    assert_eq!(call.url, "/api/v1/auth/login");
    assert_eq!(call.body, Some(serde_json::json!({"identifier": "a@b.com", "password": "secret"})));
}

#[test]
fn fetch_current_user_unwraps_user_envelope() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, ME_ENDPOINT, 200, serde_json::json!({"user": user_json(5)}));
    let client = bare_client(transport);
    assert_eq!(block_on(fetch_current_user(&client)).unwrap().id, 5);
}

#[test]
fn delete_todo_accepts_empty_body() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Delete, "/todos/3", 204, serde_json::Value::Null);
    let client = bare_client(transport.clone());
    assert!(block_on(delete_todo(&client, 3)).is_ok());
    assert_eq!(transport.calls()[0].method, Method::Delete);
}

#[test]
fn update_todo_puts_partial_body() {
    let transport = ScriptedTransport::new();
    transport.reply(
        Method::Put,
        "/todos/4",
        200,
        serde_json::json!({"id": 4, "title": "t", "completed": true}),
    );
    let client = bare_client(transport.clone());
    let update = TodoUpdate { completed: Some(true), ..TodoUpdate::default() };
    let todo = block_on(update_todo(&client, 4, &update)).unwrap();
    assert!(todo.completed);
    assert_eq!(transport.calls()[0].body, Some(serde_json::json!({"completed": true})));
}

#[test]
fn logout_tolerates_empty_body() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Post, LOGOUT_ENDPOINT, 200, serde_json::Value::Null);
    let client = bare_client(transport);
    assert!(block_on(logout(&client)).is_ok());
}
