//! User administration client methods

use warden_core::UserDetail;

use crate::error::ApiError;
use crate::session_client::{ApiRequest, SessionClient};
use crate::types::{SetGroupsRequest, SetPermissionsRequest, StatusMessage, UserPayload};

impl SessionClient {
    pub async fn list_users(&self) -> Result<Vec<UserDetail>, ApiError> {
        self.execute(ApiRequest::get("/users/")).await
    }

    pub async fn get_user(&self, id: i64) -> Result<UserDetail, ApiError> {
        self.execute(ApiRequest::get(format!("/users/{id}/"))).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> Result<UserDetail, ApiError> {
        self.execute(ApiRequest::post("/users/").json(payload)?)
            .await
    }

    pub async fn update_user(
        &self,
        id: i64,
        payload: &UserPayload,
    ) -> Result<UserDetail, ApiError> {
        self.execute(ApiRequest::patch(format!("/users/{id}/")).json(payload)?)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.execute_unit(ApiRequest::delete(format!("/users/{id}/")))
            .await
    }

    /// Replace a user's group memberships
    pub async fn set_user_groups(
        &self,
        id: i64,
        groups: &[i64],
    ) -> Result<StatusMessage, ApiError> {
        self.execute(
            ApiRequest::post(format!("/users/{id}/set_groups/"))
                .json(&SetGroupsRequest { groups })?,
        )
        .await
    }

    /// Replace a user's direct permission assignments
    pub async fn set_user_permissions(
        &self,
        id: i64,
        permissions: &[i64],
    ) -> Result<StatusMessage, ApiError> {
        self.execute(
            ApiRequest::post(format!("/users/{id}/set_permissions/"))
                .json(&SetPermissionsRequest { permissions })?,
        )
        .await
    }
}
