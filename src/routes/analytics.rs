use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::AuthUser;
use crate::authz::{permission_summary, visible_tasks, visible_work_logs};
use crate::errors::AppResult;
use crate::models::analytics::Analytics;
use crate::models::task::TaskStatus;
use crate::models::team_member::Availability;
use crate::routes::work_logs::with_member_names;

const RECENT_ACTIVITY: usize = 5;

/// Team counts cover everyone; task and hour figures are scoped to what the
/// caller may see.
#[utoipa::path(
    get,
    path = "/api/analytics",
    tag = "Analytics",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Dashboard aggregates", body = Analytics),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_analytics(State(state): State<AppState>, caller: AuthUser) -> AppResult<Json<Analytics>> {
    let principal = caller.principal();

    let members = state.store.team_members.list().await?;
    let tasks = visible_tasks(&principal, state.store.tasks.list().await?);
    let logs = visible_work_logs(&principal, state.store.work_logs.list().await?);
    let users = state.store.users.list().await?;

    let total_hours_logged: f64 = logs.iter().map(|log| log.hours).sum();
    let recent: Vec<_> = logs.into_iter().rev().take(RECENT_ACTIVITY).collect();

    let analytics = Analytics {
        total_team_members: members.len(),
        available_members: members
            .iter()
            .filter(|member| member.availability == Availability::Available)
            .count(),
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|task| task.status == TaskStatus::Completed).count(),
        total_hours_logged,
        recent_activity: with_member_names(recent, &users),
        user_position: principal.tier,
        user_permissions: permission_summary(principal.tier),
    };

    let scope = if principal.is_admin() { "all" } else { "personal" };
    audit::record(AuditAction::ViewAnalytics, caller.id(), None, json!({ "dataScope": scope }));

    Ok(Json(analytics))
}
