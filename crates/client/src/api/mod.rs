//! Typed endpoint methods
//!
//! Auth endpoints live on the bare [`crate::client::ApiClient`] (they carry
//! their own credentials); everything else goes through
//! [`crate::session_client::SessionClient`] and the retry-on-401 protocol.

mod auth;
mod groups;
mod permissions;
mod users;
