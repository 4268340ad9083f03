//! REST endpoint helpers on top of [`ApiClient`].
//!
//! Each helper names one endpoint and its wire shapes; transport, auth and
//! error classification live in the client pipeline.
//!
//! ERROR HANDLING
//! ==============
//! Helpers return the client's `Result<_, ApiError>` untouched. Stores decide
//! how a failure is recorded.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::client::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::types::{
    AuthResult, LoginCredentials, MeResponse, ProfileResponse, RegisterPayload, Todo, TodoCreate, TodoUpdate,
    User, UserProfile,
};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";
pub const ME_ENDPOINT: &str = "/auth/me";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const TODOS_ENDPOINT: &str = "/todos/";
pub const PROFILE_ENDPOINT: &str = "/users/me";

fn todo_endpoint(todo_id: i64) -> String {
    format!("/todos/{todo_id}")
}

/// `POST /auth/login`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<AuthResult, ApiError> {
    client.post(LOGIN_ENDPOINT, credentials, RequestOptions::default()).await
}

/// `POST /auth/register`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn register(client: &ApiClient, payload: &RegisterPayload) -> Result<AuthResult, ApiError> {
    client.post(REGISTER_ENDPOINT, payload, RequestOptions::default()).await
}

/// `GET /auth/me`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn fetch_current_user(client: &ApiClient) -> Result<User, ApiError> {
    let resp: MeResponse = client.get(ME_ENDPOINT, RequestOptions::default()).await?;
    Ok(resp.into_user())
}

/// `POST /auth/logout`. Quiet: a failed logout is not worth a toast.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let _: serde_json::Value = client
        .post(LOGOUT_ENDPOINT, &serde_json::json!({}), RequestOptions::default().quiet())
        .await?;
    Ok(())
}

/// `GET /todos/`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn list_todos(client: &ApiClient) -> Result<Vec<Todo>, ApiError> {
    client.get(TODOS_ENDPOINT, RequestOptions::default()).await
}

/// `GET /todos/{id}`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn get_todo(client: &ApiClient, todo_id: i64) -> Result<Todo, ApiError> {
    client.get(&todo_endpoint(todo_id), RequestOptions::default()).await
}

/// `POST /todos/`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn create_todo(client: &ApiClient, data: &TodoCreate) -> Result<Todo, ApiError> {
    client.post(TODOS_ENDPOINT, data, RequestOptions::default()).await
}

/// `PUT /todos/{id}`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn update_todo(client: &ApiClient, todo_id: i64, data: &TodoUpdate) -> Result<Todo, ApiError> {
    client.put(&todo_endpoint(todo_id), data, RequestOptions::default()).await
}

/// `DELETE /todos/{id}`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn delete_todo(client: &ApiClient, todo_id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = client
        .delete(&todo_endpoint(todo_id), RequestOptions::default())
        .await?;
    Ok(())
}

/// `GET /users/me`.
///
/// # Errors
///
/// Returns the classified [`ApiError`] on failure.
pub async fn fetch_profile(client: &ApiClient) -> Result<UserProfile, ApiError> {
    let resp: ProfileResponse = client.get(PROFILE_ENDPOINT, RequestOptions::default()).await?;
    Ok(resp.into_profile())
}
