use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::AuthUser;
use crate::authz::{can_log_work_for, can_view_all_data, visible_work_logs};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::user::User;
use crate::models::work_log::{WorkLog, WorkLogCreateRequest, WorkLogView};
use crate::routes::{ensure, non_blank};
use crate::utils::{today, utc_now};

const UNKNOWN_MEMBER: &str = "Unknown User";

/// Attaches the logged member's account name to each entry.
pub(crate) fn with_member_names(logs: Vec<WorkLog>, users: &[User]) -> Vec<WorkLogView> {
    let names: HashMap<u64, &str> = users.iter().map(|user| (user.id, user.name.as_str())).collect();

    logs.into_iter()
        .map(|log| {
            let member_name = names.get(&log.member_id).copied().unwrap_or(UNKNOWN_MEMBER).to_string();
            WorkLogView { log, member_name }
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/work-logs",
    tag = "Work logs",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All logs for admins, own logs otherwise", body = [WorkLogView]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_work_logs(State(state): State<AppState>, caller: AuthUser) -> AppResult<Json<Vec<WorkLogView>>> {
    let principal = caller.principal();
    let logs = visible_work_logs(&principal, state.store.work_logs.list().await?);
    let users = state.store.users.list().await?;

    let action = if can_view_all_data(principal.tier) {
        AuditAction::ViewAllWorkLogs
    } else {
        AuditAction::ViewMyWorkLogs
    };
    audit::record(action, caller.id(), None, json!({ "count": logs.len() }));

    Ok(Json(with_member_names(logs, &users)))
}

#[utoipa::path(
    post,
    path = "/api/work-logs",
    tag = "Work logs",
    security(("bearerAuth" = [])),
    request_body = WorkLogCreateRequest,
    responses(
        (status = 200, description = "Work logged", body = WorkLog),
        (status = 400, description = "Invalid hours, missing activity or unknown member"),
        (status = 403, description = "Caller may not log work for this member")
    )
)]
pub async fn create_work_log(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<WorkLogCreateRequest>,
) -> AppResult<Json<WorkLog>> {
    let principal = caller.principal();
    let member_id = payload.member_id.unwrap_or(principal.id);

    ensure(
        can_log_work_for(&principal, member_id),
        "You can only log work hours for yourself",
    )?;

    let hours = payload
        .hours
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .ok_or_else(|| AppError::bad_request("Hours must be a positive number"))?;
    let activity = non_blank(payload.activity).ok_or_else(|| AppError::bad_request("Activity is required"))?;

    if member_id != principal.id && state.store.users.get(member_id).await?.is_none() {
        return Err(AppError::bad_request("Target user not found"));
    }

    let log = state
        .store
        .work_logs
        .create(WorkLog {
            id: 0,
            member_id,
            logged_by: principal.id,
            hours,
            activity,
            category: non_blank(payload.category),
            date: today(),
            timestamp: utc_now(),
        })
        .await?;

    audit::record(
        AuditAction::LogWorkHours,
        principal.id,
        Some(member_id),
        json!({ "hours": log.hours, "activity": log.activity, "isOwnLog": member_id == principal.id }),
    );

    Ok(Json(log))
}
