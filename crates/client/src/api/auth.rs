//! Authentication API client methods

use reqwest::Method;
use warden_core::UserProfile;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session_client::{ApiRequest, SessionClient};
use crate::types::{
    AccessTokenResponse, CreatedAccount, LoginRequest, PasswordChange, ProfilePatch,
    RefreshRequest, Registration, TokenPair,
};

impl ApiClient {
    /// Exchange credentials for a token pair
    pub async fn create_token_pair(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, ApiError> {
        let req = self
            .request(Method::POST, "/auth/jwt/create/")
            .json(&LoginRequest { email, password });
        self.execute(req).await
    }

    /// Exchange a refresh token for a new access token
    pub async fn refresh_token(&self, refresh: &str) -> Result<AccessTokenResponse, ApiError> {
        let req = self
            .request(Method::POST, "/auth/jwt/refresh/")
            .json(&RefreshRequest { refresh });
        self.execute(req).await
    }

    /// Fetch the profile belonging to an access token
    pub async fn current_user(&self, access: &str) -> Result<UserProfile, ApiError> {
        let req = self.request_with_token(Method::GET, "/auth/users/me/", access);
        self.execute(req).await
    }

    /// Sign up a new account (does not establish a session)
    pub async fn create_account(
        &self,
        registration: &Registration,
    ) -> Result<CreatedAccount, ApiError> {
        let req = self.request(Method::POST, "/auth/users/").json(registration);
        self.execute(req).await
    }
}

impl SessionClient {
    /// Fetch the authenticated user's profile
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.execute(ApiRequest::get("/auth/users/me/")).await
    }

    /// Partially update the profile; the session's cached copy is replaced
    /// wholesale with the server's response
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, ApiError> {
        let updated: UserProfile = self
            .execute(ApiRequest::patch("/auth/users/me/").json(patch)?)
            .await?;
        self.session().replace_user(updated.clone());
        Ok(updated)
    }

    /// Change the authenticated user's password
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.execute_unit(ApiRequest::post("/auth/users/set_password/").json(change)?)
            .await
    }
}
