//! Shared wire DTOs for the REST API.
//!
//! DESIGN
//! ======
//! One canonical schema is used on the way out (`identifier`, `token`,
//! `username`). Deserialization is lenient about the field aliases older
//! backend revisions emit so the session layer never sees the drift.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// An authenticated user as returned by the auth endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    /// Login email address.
    pub email: String,
    /// Display/login name.
    #[serde(alias = "fullName", alias = "full_name")]
    pub username: String,
    /// Optional nickname shown instead of the username.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Avatar image URL, if available.
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub roles: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub permissions: Vec<String>,
}

impl User {
    /// Name used in greetings: nickname when set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// `POST /auth/login` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    /// Email or username.
    pub identifier: String,
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login/register response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResult {
    pub user: User,
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
}

/// `GET /auth/me` response: either `{ "user": {...} }` or the bare user.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MeResponse {
    Wrapped { user: User },
    Bare(User),
}

impl MeResponse {
    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

/// A todo item owned by the current user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// `POST /todos/` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TodoCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// `PUT /todos/{id}` body; absent fields are left untouched server-side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TodoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Profile shown on the profile page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// `GET /users/me` response: `{ "data": {...} }` or the bare profile.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Wrapped { data: UserProfile },
    Bare(UserProfile),
}

impl ProfileResponse {
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_vec_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    id_from_value(value).map(Some).map_err(D::Error::custom)
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value).map_err(D::Error::custom)
}

fn id_from_value(value: serde_json::Value) -> Result<i64, String> {
    match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| format!("id {number} is not an integer")),
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("id {raw:?} is not numeric")),
        other => Err(format!("expected numeric id, got {other}")),
    }
}
