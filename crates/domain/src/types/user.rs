//! User and role records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A CMS user.
///
/// Only `id` is guaranteed; everything else depends on the requested
/// `fields` and the caller's permissions. Fields the SDK does not model are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Role id, or the expanded role object when requested via `fields`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfa_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// "First Last", falling back to the email.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => self.email.clone(),
        }
    }
}

/// A permission role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_access: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_keeps_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "6f0c",
            "first_name": "Ada",
            "email": "ada@example.com",
            "role": "admin-role",
            "theme": "dark"
        }))
        .unwrap();

        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.role, Some(json!("admin-role")));
        assert_eq!(user.extra.get("theme"), Some(&json!("dark")));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["theme"], "dark");
        assert!(back.get("last_name").is_none());
    }

    #[test]
    fn display_name_fallbacks() {
        let mut user = User { id: "1".into(), ..Default::default() };
        assert_eq!(user.display_name(), None);

        user.email = Some("x@y.z".into());
        assert_eq!(user.display_name().as_deref(), Some("x@y.z"));

        user.first_name = Some("Grace".into());
        assert_eq!(user.display_name().as_deref(), Some("Grace"));

        user.last_name = Some("Hopper".into());
        assert_eq!(user.display_name().as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn role_with_missing_optional_fields() {
        let role: Role = serde_json::from_value(json!({"id": "r1", "name": "Editor"})).unwrap();
        assert_eq!(role.name, "Editor");
        assert!(role.admin_access.is_none());
    }
}
