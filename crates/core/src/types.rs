//! Domain types used by both the session layer and the admin API client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group membership as embedded in a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    pub name: String,
}

/// Server-issued account record
///
/// Treated as a read-mostly cache of server state: replaced wholesale after
/// any mutation, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Full display name, falling back to the email address
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// A single permission from the admin catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub codename: String,
}

/// Admin-facing user record with resolved permission assignments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
    #[serde(default)]
    pub user_permissions: Vec<Permission>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Group with its resolved permission set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile {
            id: 1,
            email: "a@b.com".into(),
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
            is_staff: false,
            groups: vec![],
            date_joined: None,
            last_login: None,
        };
        assert_eq!(profile.display_name(), "a@b.com");
    }

    #[test]
    fn profile_deserializes_with_missing_optional_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "a@b.com",
            "is_active": true,
            "is_staff": false
        }))
        .unwrap();
        assert_eq!(profile.email, "a@b.com");
        assert!(profile.groups.is_empty());
        assert!(profile.last_login.is_none());
    }
}
