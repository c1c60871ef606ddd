//! Integration tests for the authenticated admin endpoints

mod common;

use common::Harness;
use serde_json::json;
use warden_client::error::ApiError;
use warden_client::types::{GroupPayload, PasswordChange, ProfilePatch, UserPayload};
use warden_core::TokenStore;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn user_json(id: i64, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "is_active": true,
        "is_staff": false,
        "is_superuser": false,
        "groups": [],
        "user_permissions": [],
    })
}

#[tokio::test]
async fn admin_user_crud_round_trip() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();
    let client = h.client();

    Mock::given(method("GET"))
        .and(path("/users/"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([user_json(1, "a@b.com"), user_json(2, "b@b.com")])),
        )
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/"))
        .and(body_json(json!({"email": "c@b.com", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json(3, "c@b.com")))
        .mount(&h.server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/users/3/"))
        .and(body_json(json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(3, "c@b.com")))
        .mount(&h.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/users/3/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&h.server)
        .await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].email, "b@b.com");

    let created = client
        .create_user(&UserPayload {
            email: Some("c@b.com".into()),
            password: Some("secret123".into()),
            ..UserPayload::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);

    client
        .update_user(
            3,
            &UserPayload {
                is_active: Some(false),
                ..UserPayload::default()
            },
        )
        .await
        .unwrap();

    client.delete_user(3).await.unwrap();
}

#[tokio::test]
async fn set_user_groups_posts_the_id_list() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();

    Mock::given(method("POST"))
        .and(path("/users/7/set_groups/"))
        .and(body_json(json!({"groups": [1, 3]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "groups set"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let status = h.client().set_user_groups(7, &[1, 3]).await.unwrap();
    assert_eq!(status.status, "groups set");
}

#[tokio::test]
async fn group_endpoints_round_trip() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();
    let client = h.client();

    Mock::given(method("GET"))
        .and(path("/groups/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "admins"},
            {"id": 2, "name": "editors"}
        ])))
        .mount(&h.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/groups/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "admins",
            "permissions": [
                {"id": 10, "name": "Can add user", "codename": "add_user"}
            ]
        })))
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/groups/"))
        .and(body_json(json!({"name": "auditors"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "auditors"})),
        )
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/groups/3/set_permissions/"))
        .and(body_json(json!({"permissions": [10]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "permissions set"})),
        )
        .mount(&h.server)
        .await;

    let groups = client.list_groups().await.unwrap();
    assert_eq!(groups.len(), 2);

    let detail = client.get_group(1).await.unwrap();
    assert_eq!(detail.permissions[0].codename, "add_user");

    let created = client
        .create_group(&GroupPayload {
            name: "auditors".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);

    let status = client.set_group_permissions(3, &[10]).await.unwrap();
    assert_eq!(status.status, "permissions set");
}

#[tokio::test]
async fn list_permissions_returns_the_catalogue() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();

    Mock::given(method("GET"))
        .and(path("/permissions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Can add user", "codename": "add_user"},
            {"id": 11, "name": "Can delete user", "codename": "delete_user"}
        ])))
        .mount(&h.server)
        .await;

    let permissions = h.client().list_permissions().await.unwrap();
    assert_eq!(permissions.len(), 2);
    assert_eq!(permissions[1].codename, "delete_user");
}

#[tokio::test]
async fn update_profile_replaces_the_cached_user_wholesale() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();

    Mock::given(method("PATCH"))
        .and(path("/auth/users/me/"))
        .and(body_json(json!({"first_name": "Grace"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "a@b.com",
            "first_name": "Grace",
            "last_name": "Hopper",
            "is_active": true,
            "is_staff": false,
            "groups": [{"id": 2, "name": "editors"}],
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let updated = h
        .client()
        .update_profile(&ProfilePatch {
            first_name: Some("Grace".into()),
            ..ProfilePatch::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.first_name, "Grace");
    // The session cache is the server's copy, groups included
    let cached = h.session.user().unwrap();
    assert_eq!(cached.first_name, "Grace");
    assert_eq!(cached.groups[0].name, "editors");
}

#[tokio::test]
async fn change_password_accepts_an_empty_204() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/users/set_password/"))
        .and(header("authorization", "Bearer tok1"))
        .and(body_json(json!({
            "current_password": "old-secret",
            "new_password": "new-secret",
            "re_new_password": "new-secret"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client()
        .change_password(&PasswordChange {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            re_new_password: "new-secret".into(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn profile_fetch_passes_non_auth_errors_through() {
    let h = Harness::start().await;
    h.store.store_token_pair("tok1", "ref1").await.unwrap();

    Mock::given(method("GET"))
        .and(path("/auth/users/me/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "You do not have permission to perform this action."
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client().profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn unauthenticated_requests_omit_the_authorization_header() {
    let h = Harness::start().await;

    // No token in the store; the request must not carry an Authorization
    // header, and the 403 passes through without a refresh attempt.
    Mock::given(method("GET"))
        .and(path("/permissions/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client().list_permissions().await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}
