//! Warden core types and utilities

pub mod error;
pub mod listing;
pub mod store;
pub mod token;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use listing::HasId;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::AccessClaims;
pub use types::{GroupDetail, GroupRef, Permission, UserDetail, UserProfile};
