//! Group administration client methods

use warden_core::{GroupDetail, GroupRef};

use crate::error::ApiError;
use crate::session_client::{ApiRequest, SessionClient};
use crate::types::{GroupPayload, SetPermissionsRequest, StatusMessage};

impl SessionClient {
    pub async fn list_groups(&self) -> Result<Vec<GroupRef>, ApiError> {
        self.execute(ApiRequest::get("/groups/")).await
    }

    /// Fetch a group with its resolved permission set
    pub async fn get_group(&self, id: i64) -> Result<GroupDetail, ApiError> {
        self.execute(ApiRequest::get(format!("/groups/{id}/")))
            .await
    }

    pub async fn create_group(&self, payload: &GroupPayload) -> Result<GroupRef, ApiError> {
        self.execute(ApiRequest::post("/groups/").json(payload)?)
            .await
    }

    pub async fn update_group(
        &self,
        id: i64,
        payload: &GroupPayload,
    ) -> Result<GroupRef, ApiError> {
        self.execute(ApiRequest::patch(format!("/groups/{id}/")).json(payload)?)
            .await
    }

    pub async fn delete_group(&self, id: i64) -> Result<(), ApiError> {
        self.execute_unit(ApiRequest::delete(format!("/groups/{id}/")))
            .await
    }

    /// Replace a group's permission set
    pub async fn set_group_permissions(
        &self,
        id: i64,
        permissions: &[i64],
    ) -> Result<StatusMessage, ApiError> {
        self.execute(
            ApiRequest::post(format!("/groups/{id}/set_permissions/"))
                .json(&SetPermissionsRequest { permissions })?,
        )
        .await
    }
}
