use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::Tier;
use crate::models::work_log::WorkLogView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSummary {
    pub can_manage_team: bool,
    pub can_assign_tasks: bool,
    pub can_view_all_data: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_team_members: usize,
    pub available_members: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_hours_logged: f64,
    pub recent_activity: Vec<WorkLogView>,
    pub user_position: Tier,
    pub user_permissions: PermissionSummary,
}
