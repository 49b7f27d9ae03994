//! Audit trail.
//!
//! Every security-relevant action is emitted as a structured `tracing` event
//! on the `audit` target, so it can be routed separately with
//! `RUST_LOG=audit=info`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    UserLogin,
    UserLogout,
    PasswordChanged,
    PasswordResetRequested,
    PasswordReset,
    AdminRegisterEmployee,
    AddTeamMember,
    UpdateTeamMember,
    ViewAllTeamMembers,
    LogWorkHours,
    ViewAllWorkLogs,
    ViewMyWorkLogs,
    CreateTask,
    UpdateTask,
    ViewAllTasks,
    ViewMyTasks,
    ViewAnalytics,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserLogin => "USER_LOGIN",
            AuditAction::UserLogout => "USER_LOGOUT",
            AuditAction::PasswordChanged => "PASSWORD_CHANGED",
            AuditAction::PasswordResetRequested => "PASSWORD_RESET_REQUESTED",
            AuditAction::PasswordReset => "PASSWORD_RESET",
            AuditAction::AdminRegisterEmployee => "ADMIN_REGISTER_EMPLOYEE",
            AuditAction::AddTeamMember => "ADD_TEAM_MEMBER",
            AuditAction::UpdateTeamMember => "UPDATE_TEAM_MEMBER",
            AuditAction::ViewAllTeamMembers => "VIEW_ALL_TEAM_MEMBERS",
            AuditAction::LogWorkHours => "LOG_WORK_HOURS",
            AuditAction::ViewAllWorkLogs => "VIEW_ALL_WORK_LOGS",
            AuditAction::ViewMyWorkLogs => "VIEW_MY_WORK_LOGS",
            AuditAction::CreateTask => "CREATE_TASK",
            AuditAction::UpdateTask => "UPDATE_TASK",
            AuditAction::ViewAllTasks => "VIEW_ALL_TASKS",
            AuditAction::ViewMyTasks => "VIEW_MY_TASKS",
            AuditAction::ViewAnalytics => "VIEW_ANALYTICS",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: Uuid,
    pub action: AuditAction,
    pub occurred_at: DateTime<Utc>,
    pub actor_id: Option<u64>,
    pub target_id: Option<u64>,
    pub details: Value,
}

impl AuditEvent {
    pub fn new(action: AuditAction, actor_id: Option<u64>, target_id: Option<u64>, details: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            occurred_at: Utc::now(),
            actor_id,
            target_id,
            details,
        }
    }

    pub fn emit(&self) {
        tracing::info!(
            target: "audit",
            event_id = %self.id,
            action = self.action.as_str(),
            actor_id = ?self.actor_id,
            target_id = ?self.target_id,
            details = %self.details,
            "audit"
        );
    }
}

/// Records an action taken by `actor_id`, optionally against `target_id`.
pub fn record(action: AuditAction, actor_id: u64, target_id: Option<u64>, details: Value) -> AuditEvent {
    let event = AuditEvent::new(action, Some(actor_id), target_id, details);
    event.emit();
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_serializes_with_screaming_action() {
        let event = AuditEvent::new(AuditAction::LogWorkHours, Some(3), Some(3), json!({"hours": 2.0}));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["action"], "LOG_WORK_HOURS");
        assert_eq!(value["actorId"], 3);
        assert_eq!(value["details"]["hours"], 2.0);
        assert_eq!(serde_json::to_value(AuditAction::ViewMyTasks).unwrap(), AuditAction::ViewMyTasks.as_str());
    }
}
