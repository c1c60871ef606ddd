//! Permission catalogue client methods

use warden_core::Permission;

use crate::error::ApiError;
use crate::session_client::{ApiRequest, SessionClient};

impl SessionClient {
    pub async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        self.execute(ApiRequest::get("/permissions/")).await
    }
}
