//! Wire types for the auth and admin endpoints

use serde::{Deserialize, Serialize};

/// Response of `POST /auth/jwt/create/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response of `POST /auth/jwt/refresh/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Payload of `POST /auth/users/` — account sign-up
///
/// Activation happens out of band; a successful registration does not
/// establish a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub re_password: String,
}

/// Response of `POST /auth/users/` (201)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAccount {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Partial update for `PATCH /auth/users/me/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Payload of `POST /auth/users/set_password/`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub re_new_password: String,
}

/// Create/update payload for the admin `/users/` endpoints
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
}

/// Create/update payload for the admin `/groups/` endpoints
#[derive(Debug, Clone, Serialize)]
pub struct GroupPayload {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SetGroupsRequest<'a> {
    pub groups: &'a [i64],
}

#[derive(Debug, Serialize)]
pub(crate) struct SetPermissionsRequest<'a> {
    pub permissions: &'a [i64],
}

/// Acknowledgement body of the admin `set_*` actions
#[derive(Debug, Clone, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}
