//! Session-aware client wrapper
//!
//! Decorates the bare [`ApiClient`] with the session's bearer token and the
//! retry-on-expiry protocol: a first-time 401 triggers one token refresh
//! (joining any refresh already in flight) and one re-issue of the identical
//! request. A second 401 is a real failure and passes through.

use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::session::SessionManager;

/// A re-issuable request: method, path, and optional JSON body
///
/// The request is rebuilt from these parts for every attempt, so a retried
/// call carries its original method, path, and body unchanged; only the
/// Authorization header differs. Whether a request has already been retried
/// lives in the decorator's control flow, not on the request itself.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Client for authenticated endpoints, wrapping all traffic in the session's
/// interceptor protocol
#[derive(Clone)]
pub struct SessionClient {
    session: SessionManager,
}

impl SessionClient {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Execute a request and decode its JSON response
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.send(&request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ApiError::from_status(status, body))
        }
    }

    /// Execute a request whose success response carries no body (204/205)
    pub async fn execute_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.send(&request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ApiError::from_status(status, body))
        }
    }

    async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let token = self.session.access_token().await?;
        let response = self.dispatch(request, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(
            method = %request.method,
            path = %request.path,
            "request rejected with 401, refreshing token"
        );
        let fresh = match self.session.refresh_access_token().await {
            Ok(token) => token,
            Err(refresh_err) => {
                // Fatal to the session; the caller sees the refresh's error
                self.session.logout().await;
                return Err(refresh_err.into());
            }
        };

        // One retry per request, with the token the refresh resolved to.
        // A second 401 passes through as a genuine failure.
        let response = self.dispatch(request, Some(&fresh)).await?;
        Ok(response)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut builder = self
            .session
            .api()
            .request(request.method.clone(), &request.path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }
}
