use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Platform roles. Stored as a Postgres enum; values only enter storage
/// through [`UserRole::parse`], which normalizes whatever the client sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Professor,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Professor => "professor",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super_admin",
        }
    }

    /// Strict parse with write-time normalization (case and surrounding
    /// whitespace). Reads never trim; the database only holds canonical
    /// values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(UserRole::Student),
            "professor" => Some(UserRole::Professor),
            "admin" => Some(UserRole::Admin),
            "super_admin" => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }

    pub fn can_manage_admins(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

/// User profile row. The id comes from the external auth provider; the
/// profile is created on first registration and carries the denormalized
/// activity counters shown on profile pages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub college_usn: Option<String>,
    pub department: Option<String>,
    pub year: Option<i16>,
    pub role: UserRole,
    pub upload_count: i32,
    pub download_count: i32,
    pub upvotes_received: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// USN (or college id) shown on reports; falls back the way the client
    /// did.
    pub fn usn_or_default(&self) -> String {
        self.college_usn
            .clone()
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_normalizes() {
        assert_eq!(UserRole::parse("student"), Some(UserRole::Student));
        assert_eq!(UserRole::parse(" super_admin "), Some(UserRole::SuperAdmin));
        assert_eq!(UserRole::parse("Professor"), Some(UserRole::Professor));
        assert_eq!(UserRole::parse("moderator"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::SuperAdmin.is_admin());
        assert!(!UserRole::Student.is_admin());
        assert!(!UserRole::Professor.is_admin());

        assert!(UserRole::SuperAdmin.can_manage_admins());
        assert!(!UserRole::Admin.can_manage_admins());
    }
}
