//! Session lifecycle and the token refresh protocol

use std::sync::Arc;

use arc_swap::ArcSwap;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, warn};
use warden_core::{AccessClaims, TokenStore, UserProfile};

use crate::client::ApiClient;
use crate::error::{ApiError, FormErrors, RefreshError};
use crate::types::{CreatedAccount, Registration};

const LOGIN_FALLBACK: &str = "Login failed. Please try again.";
const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";

/// Immutable snapshot of the session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub initializing: bool,
    pub last_error: Option<FormErrors>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            // Starts true until the persisted tokens have been checked
            initializing: true,
            last_error: None,
        }
    }
}

type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

struct SessionInner {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: ArcSwap<SessionState>,
    /// The in-flight refresh, if any. Concurrent triggers join this future
    /// instead of issuing their own network call.
    refresh: tokio::sync::Mutex<Option<SharedRefresh>>,
}

impl SessionInner {
    fn update_state(&self, apply: impl Fn(&mut SessionState)) {
        self.state.rcu(|state| {
            let mut next = (**state).clone();
            apply(&mut next);
            Arc::new(next)
        });
    }

    fn set_user(&self, user: Option<UserProfile>) {
        self.update_state(|state| state.user = user.clone());
    }
}

/// Owner of the authenticated-user value, the persisted token pair, and the
/// refresh protocol
///
/// Cheap to clone; all clones observe and mutate the same session. The
/// manager is the sole mutator of both the in-memory snapshot and the
/// persisted tokens.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                store,
                state: ArcSwap::from_pointee(SessionState::default()),
                refresh: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Resume a persisted session, if any. Call once at startup.
    ///
    /// Reads the persisted token pair, refreshes preemptively when the access
    /// token's `exp` is in the past, and otherwise validates the session by
    /// fetching the profile. Any failure clears the session; `initializing`
    /// always ends up false.
    pub async fn initialize(&self) {
        if let Err(err) = self.startup().await {
            warn!(error = %err, "session startup failed, clearing session");
            self.clear_session().await;
        }
        self.inner.update_state(|state| state.initializing = false);
    }

    async fn startup(&self) -> Result<(), ApiError> {
        let access = self.inner.store.access_token().await?;
        let refresh = self.inner.store.refresh_token().await?;
        let (Some(access), Some(_)) = (access, refresh) else {
            debug!("no persisted session");
            return Ok(());
        };

        let claims = AccessClaims::decode(&access)?;
        if claims.is_expired() {
            self.refresh_access_token().await?;
        } else {
            // Fail closed: an unreadable profile means the session is not
            // usable, whatever the reason.
            let profile = self.inner.api.current_user(&access).await?;
            self.inner.set_user(Some(profile));
        }
        Ok(())
    }

    /// Exchange credentials for a session
    ///
    /// On success both tokens are persisted and the profile cached; on
    /// failure the server's structured error is recorded as `last_error` and
    /// the session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.inner.update_state(|state| state.last_error = None);
        match self.try_login(email, password).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.inner.update_state(|state| {
                    state.last_error = Some(FormErrors::from_error(&err, LOGIN_FALLBACK));
                });
                Err(err)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let pair = self.inner.api.create_token_pair(email, password).await?;
        self.inner
            .store
            .store_token_pair(&pair.access, &pair.refresh)
            .await?;
        let profile = self.inner.api.current_user(&pair.access).await?;
        debug!(user = %profile.email, "login succeeded");
        self.inner.set_user(Some(profile));
        Ok(())
    }

    /// Sign up a new account
    ///
    /// Does not establish a session: activation is a separate step outside
    /// this component.
    pub async fn register(&self, registration: &Registration) -> Result<CreatedAccount, ApiError> {
        self.inner.update_state(|state| state.last_error = None);
        match self.inner.api.create_account(registration).await {
            Ok(account) => Ok(account),
            Err(err) => {
                self.inner.update_state(|state| {
                    state.last_error = Some(FormErrors::from_error(&err, REGISTER_FALLBACK));
                });
                Err(err)
            }
        }
    }

    /// End the session: clear the in-memory state and the persisted tokens
    ///
    /// The single authority for tearing a session down. Idempotent, never
    /// fails, and safe to call at any point including mid-refresh.
    pub async fn logout(&self) {
        self.clear_session().await;
    }

    async fn clear_session(&self) {
        // In-memory state first; clearing the persisted copy can fail
        self.inner.update_state(|state| {
            state.user = None;
            state.last_error = None;
        });
        if let Err(err) = self.inner.store.clear().await {
            warn!(error = %err, "failed to clear persisted tokens");
        }
    }

    /// Run the refresh protocol, or join the one already in flight
    ///
    /// At most one refresh call is issued no matter how many requests observe
    /// a 401 simultaneously; every caller awaiting it receives the same
    /// outcome. On success the new access token is persisted and the profile
    /// re-fetched with it. Failures are never retried here; the caller must
    /// log out.
    pub async fn refresh_access_token(&self) -> Result<String, RefreshError> {
        let shared = {
            let mut slot = self.inner.refresh.lock().await;
            if let Some(pending) = slot.as_ref() {
                debug!("joining in-flight token refresh");
                pending.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let fut: SharedRefresh = async move {
                    let outcome = run_refresh(&inner).await;
                    *inner.refresh.lock().await = None;
                    outcome
                }
                .boxed()
                .shared();
                *slot = Some(fut.clone());
                fut
            }
        };
        shared.await
    }

    /// Current profile, if authenticated
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.load().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.load().user.is_some()
    }

    /// Whether the startup protocol is still running
    pub fn is_loading(&self) -> bool {
        self.inner.state.load().initializing
    }

    /// Structured error from the last failed login/registration
    pub fn last_error(&self) -> Option<FormErrors> {
        self.inner.state.load().last_error.clone()
    }

    /// Full state snapshot
    pub fn state(&self) -> Arc<SessionState> {
        self.inner.state.load_full()
    }

    /// The persisted access token, if any
    pub async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.inner.store.access_token().await?)
    }

    /// The underlying API client
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub(crate) fn replace_user(&self, profile: UserProfile) {
        self.inner.set_user(Some(profile));
    }
}

async fn run_refresh(inner: &Arc<SessionInner>) -> Result<String, RefreshError> {
    let storage_failed = |err: warden_core::CoreError| RefreshError::Failed {
        message: err.to_string(),
    };

    let refresh = inner
        .store
        .refresh_token()
        .await
        .map_err(storage_failed)?
        .ok_or(RefreshError::MissingToken)?;

    let fresh = inner
        .api
        .refresh_token(&refresh)
        .await
        .map_err(|err| RefreshError::from_api(&err))?;

    // A logout that raced the round-trip wins: never resurrect a cleared
    // session with a fresh access token.
    if inner
        .store
        .refresh_token()
        .await
        .map_err(storage_failed)?
        .is_none()
    {
        return Err(RefreshError::MissingToken);
    }

    inner
        .store
        .store_access_token(&fresh.access)
        .await
        .map_err(storage_failed)?;

    let profile = inner
        .api
        .current_user(&fresh.access)
        .await
        .map_err(|err| RefreshError::Failed {
            message: format!("profile fetch with refreshed token failed: {err}"),
        })?;
    inner.set_user(Some(profile));

    debug!("access token refreshed");
    Ok(fresh.access)
}
