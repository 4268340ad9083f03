use super::*;

// =============================================================
// User
// =============================================================

#[test]
fn user_deserializes_backend_shape_with_null_lists() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 7,
        "email": "a@b.com",
        "username": "alice",
        "is_active": true,
        "is_superuser": false,
        "roles": null,
        "permissions": ["todo:write"]
    }))
    .unwrap();
    assert_eq!(user.id, 7);
    assert!(user.roles.is_empty());
    assert_eq!(user.permissions, vec!["todo:write".to_owned()]);
}

#[test]
fn user_accepts_string_id_and_full_name_alias() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": "42",
        "email": "a@b.com",
        "fullName": "Alice A"
    }))
    .unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.username, "Alice A");
    assert!(user.is_active);
}

#[test]
fn user_rejects_non_numeric_id() {
    let result = serde_json::from_value::<User>(serde_json::json!({
        "id": "abc",
        "email": "a@b.com",
        "username": "alice"
    }));
    assert!(result.is_err());
}

#[test]
fn display_name_prefers_nickname() {
    let mut user: User = serde_json::from_value(serde_json::json!({
        "id": 1, "email": "a@b.com", "username": "alice"
    }))
    .unwrap();
    assert_eq!(user.display_name(), "alice");
    user.nickname = Some("Al".to_owned());
    assert_eq!(user.display_name(), "Al");
    user.nickname = Some("  ".to_owned());
    assert_eq!(user.display_name(), "alice");
}

// =============================================================
// Auth payloads
// =============================================================

#[test]
fn login_credentials_serialize_with_identifier_field() {
    let creds = LoginCredentials { identifier: "a@b.com".to_owned(), password: "x".to_owned() };
    assert_eq!(
        serde_json::to_value(&creds).unwrap(),
        serde_json::json!({"identifier": "a@b.com", "password": "x"})
    );
}

#[test]
fn auth_result_accepts_token_aliases() {
    for key in ["token", "access_token", "accessToken"] {
        let body = format!(r#"{{"user": {{"id": 1, "email": "a@b.com", "username": "alice"}}, "{key}": "tok-1"}}"#);
        let result: AuthResult = serde_json::from_str(&body).unwrap();
        assert_eq!(result.token, "tok-1", "alias {key}");
    }
}

#[test]
fn me_response_accepts_wrapped_and_bare_user() {
    let wrapped: MeResponse = serde_json::from_value(serde_json::json!({
        "user": {"id": 1, "email": "a@b.com", "username": "alice"}
    }))
    .unwrap();
    let bare: MeResponse =
        serde_json::from_value(serde_json::json!({"id": 1, "email": "a@b.com", "username": "alice"})).unwrap();
    assert_eq!(wrapped.into_user(), bare.into_user());
}

// =============================================================
// Todos + profile
// =============================================================

#[test]
fn todo_update_skips_absent_fields() {
    let update = TodoUpdate { completed: Some(true), ..TodoUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"completed": true}));
}

#[test]
fn todo_deserializes_with_optional_owner() {
    let todo: Todo = serde_json::from_value(serde_json::json!({
        "id": 3,
        "title": "write tests",
        "description": null,
        "completed": false,
        "owner_id": null
    }))
    .unwrap();
    assert_eq!(todo.id, 3);
    assert_eq!(todo.owner_id, None);
}

#[test]
fn profile_response_unwraps_data_envelope() {
    let profile: ProfileResponse = serde_json::from_value(serde_json::json!({
        "data": {"id": 2, "username": "bob", "email": "bob@b.com", "bio": "hi"}
    }))
    .unwrap();
    let profile = profile.into_profile();
    assert_eq!(profile.username, "bob");
    assert_eq!(profile.bio.as_deref(), Some("hi"));
}
