use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserRole;

/// Administrative actions recorded in the audit log.
///
/// One variant per action kind, each with its own typed payload. The
/// serialized tag becomes the `action_type` column and the payload lands in
/// `details`, so adding an action kind forces every match site to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action_type", rename_all = "snake_case")]
pub enum AdminAction {
    PromoteAdmin {
        target_user: Uuid,
        previous_role: UserRole,
    },
    DemoteAdmin {
        target_user: Uuid,
        new_role: UserRole,
    },
    DeleteNote {
        note_id: Uuid,
        reason: String,
    },
    RestoreNote {
        note_id: Uuid,
    },
    DismissReport {
        report_id: Uuid,
        note_id: Uuid,
    },
}

impl AdminAction {
    pub fn action_type(&self) -> &'static str {
        match self {
            AdminAction::PromoteAdmin { .. } => "promote_admin",
            AdminAction::DemoteAdmin { .. } => "demote_admin",
            AdminAction::DeleteNote { .. } => "delete_note",
            AdminAction::RestoreNote { .. } => "restore_note",
            AdminAction::DismissReport { .. } => "dismiss_report",
        }
    }

    /// Primary target of the action, as stored in the `target_id` column.
    pub fn target_id(&self) -> String {
        match self {
            AdminAction::PromoteAdmin { target_user, .. } => target_user.to_string(),
            AdminAction::DemoteAdmin { target_user, .. } => target_user.to_string(),
            AdminAction::DeleteNote { note_id, .. } => note_id.to_string(),
            AdminAction::RestoreNote { note_id } => note_id.to_string(),
            AdminAction::DismissReport { report_id, .. } => report_id.to_string(),
        }
    }
}

/// Append-only audit log row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminLog {
    pub id: Uuid,
    pub action_type: String,
    pub performed_by: Uuid,
    pub performed_by_name: String,
    pub target_id: String,
    pub target_name: String,
    pub reason: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_matches_serialized_tag() {
        let action = AdminAction::RestoreNote {
            note_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action_type"], action.action_type());
    }

    #[test]
    fn test_payload_carries_typed_fields() {
        let target = Uuid::new_v4();
        let action = AdminAction::PromoteAdmin {
            target_user: target,
            previous_role: UserRole::Professor,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["action_type"], "promote_admin");
        assert_eq!(json["target_user"], target.to_string());
        assert_eq!(json["previous_role"], "professor");
        assert_eq!(action.target_id(), target.to_string());
    }

    #[test]
    fn test_roundtrip() {
        let action = AdminAction::DismissReport {
            report_id: Uuid::new_v4(),
            note_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(&action).unwrap();
        let back: AdminAction = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }
}
