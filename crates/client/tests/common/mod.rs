//! Shared fixtures for the integration tests
#![allow(dead_code)] // not every binary uses every fixture

use std::sync::Arc;

use serde_json::json;
use warden_client::client::ApiClient;
use warden_client::session::SessionManager;
use warden_client::session_client::SessionClient;
use warden_core::MemoryTokenStore;
use wiremock::MockServer;

/// A signed JWT whose `exp` is `offset_secs` from now. The signing key is
/// arbitrary: the client never verifies signatures.
pub fn signed_token(offset_secs: i64) -> String {
    let claims = json!({
        "exp": chrono::Utc::now().timestamp() + offset_secs,
        "user_id": 1,
    });
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub fn profile_json(email: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "email": email,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "is_active": true,
        "is_staff": false,
        "groups": [],
    })
}

pub struct Harness {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub session: SessionManager,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::new());
        let api = ApiClient::new(server.uri()).unwrap();
        let session = SessionManager::new(api, store.clone());
        Self {
            server,
            store,
            session,
        }
    }

    pub fn client(&self) -> SessionClient {
        SessionClient::new(self.session.clone())
    }
}
