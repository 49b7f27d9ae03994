//! Authorization - position normalization and permission policy
//!
//! Stored users still carry the legacy three-tier position (Regular
//! Employee / Team Lead / QA Manager). Every decision is made on the
//! two-tier model (Employee / Admin) produced by [`normalize`].

mod policy;
mod position;
mod principal;

pub use policy::{
    can_assign_tasks, can_edit_task, can_edit_user, can_log_work_for, can_manage_team, can_view_all_data,
    permission_summary, restrict_profile_update, restrict_task_update, task_visible_to, visible_tasks,
    visible_work_logs, work_log_visible_to,
};
pub use position::{legacy_for_tier, normalize, position_for_role, LegacyPosition, Position, Tier, UnknownPosition};
pub use principal::Principal;
