//! Permission decisions. Every function here is pure: a denial is `false`
//! (or a narrower payload), never an error.

use super::position::Tier;
use super::principal::Principal;
use crate::models::analytics::PermissionSummary;
use crate::models::task::{Task, TaskUpdateRequest};
use crate::models::team_member::TeamMemberUpdate;
use crate::models::work_log::WorkLog;

/// Creating member/account pairs.
pub fn can_manage_team(tier: Tier) -> bool {
    tier.is_admin()
}

pub fn can_assign_tasks(tier: Tier) -> bool {
    tier.is_admin()
}

/// Whether task and work-log listings are global rather than self-scoped.
pub fn can_view_all_data(tier: Tier) -> bool {
    tier.is_admin()
}

/// Self-edit always wins, independent of tier.
pub fn can_edit_user(actor: &Principal, target_id: u64) -> bool {
    actor.id == target_id || actor.is_admin()
}

pub fn can_edit_task(actor: &Principal, task: &Task) -> bool {
    actor.is_admin() || task.assigned_to == actor.id || task.created_by == Some(actor.id)
}

pub fn can_log_work_for(actor: &Principal, member_id: u64) -> bool {
    actor.id == member_id || actor.is_admin()
}

pub fn permission_summary(tier: Tier) -> PermissionSummary {
    PermissionSummary {
        can_manage_team: can_manage_team(tier),
        can_assign_tasks: can_assign_tasks(tier),
        can_view_all_data: can_view_all_data(tier),
    }
}

/// Narrows a task update to what `actor` may actually change. An employee
/// working their own assignment only gets `status` and `comments` through;
/// the rest is dropped silently.
pub fn restrict_task_update(actor: &Principal, task: &Task, update: TaskUpdateRequest) -> TaskUpdateRequest {
    if actor.tier == Tier::Employee && task.assigned_to == actor.id {
        update.assignee_fields_only()
    } else {
        update
    }
}

/// Non-admins cannot touch administrative profile fields.
pub fn restrict_profile_update(actor: &Principal, update: TeamMemberUpdate) -> TeamMemberUpdate {
    if actor.is_admin() {
        update
    } else {
        update.without_admin_fields()
    }
}

pub fn task_visible_to(actor: &Principal, task: &Task) -> bool {
    can_view_all_data(actor.tier) || task.assigned_to == actor.id
}

pub fn work_log_visible_to(actor: &Principal, log: &WorkLog) -> bool {
    can_view_all_data(actor.tier) || log.member_id == actor.id
}

pub fn visible_tasks(actor: &Principal, tasks: Vec<Task>) -> Vec<Task> {
    tasks.into_iter().filter(|task| task_visible_to(actor, task)).collect()
}

pub fn visible_work_logs(actor: &Principal, logs: Vec<WorkLog>) -> Vec<WorkLog> {
    logs.into_iter().filter(|log| work_log_visible_to(actor, log)).collect()
}
