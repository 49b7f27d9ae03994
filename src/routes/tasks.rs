use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::AuthUser;
use crate::authz::{can_assign_tasks, can_edit_task, can_view_all_data, restrict_task_update, visible_tasks};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::task::{Task, TaskCreateRequest, TaskStatus, TaskUpdateRequest};
use crate::routes::{ensure, non_blank};
use crate::store::RecordStore;
use crate::utils::today;

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All tasks for admins, own tasks otherwise", body = [Task]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_tasks(State(state): State<AppState>, caller: AuthUser) -> AppResult<Json<Vec<Task>>> {
    let principal = caller.principal();
    let tasks = visible_tasks(&principal, state.store.tasks.list().await?);

    let action = if can_view_all_data(principal.tier) {
        AuditAction::ViewAllTasks
    } else {
        AuditAction::ViewMyTasks
    };
    audit::record(action, caller.id(), None, json!({ "count": tasks.len() }));

    Ok(Json(tasks))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    request_body = TaskCreateRequest,
    responses(
        (status = 200, description = "Task created", body = Task),
        (status = 400, description = "Missing field or unknown assignee"),
        (status = 403, description = "Caller cannot assign tasks")
    )
)]
pub async fn create_task(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<TaskCreateRequest>,
) -> AppResult<Json<Task>> {
    ensure(can_assign_tasks(caller.user.position), "Only admins can create tasks")?;

    let title = non_blank(payload.title).ok_or_else(|| AppError::bad_request("Task title is required"))?;
    let assigned_to = payload
        .assigned_to
        .ok_or_else(|| AppError::bad_request("Assignee is required"))?;
    let priority = payload
        .priority
        .ok_or_else(|| AppError::bad_request("Priority is required"))?;
    let due_date = payload
        .due_date
        .ok_or_else(|| AppError::bad_request("Due date is required"))?;

    ensure_assignee_exists(&state.store, assigned_to).await?;

    let task = state
        .store
        .tasks
        .create(Task {
            id: 0,
            title,
            description: non_blank(payload.description),
            assigned_to,
            priority,
            status: TaskStatus::Pending,
            created_by: Some(caller.id()),
            created_date: Some(today()),
            due_date: Some(due_date),
            comments: None,
        })
        .await?;

    audit::record(
        AuditAction::CreateTask,
        caller.id(),
        Some(task.id),
        json!({ "taskTitle": task.title, "assignedTo": task.assigned_to, "priority": task.priority }),
    );

    Ok(Json(task))
}

/// Employees editing a task assigned to them can only change its status and
/// comments; any other field in the payload is ignored.
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    security(("bearerAuth" = [])),
    params(("id" = u64, Path, description = "Task id")),
    request_body = TaskUpdateRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Unknown assignee"),
        (status = 403, description = "Caller may not edit this task"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn update_task(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<u64>,
    ApiJson(payload): ApiJson<TaskUpdateRequest>,
) -> AppResult<Json<Task>> {
    let principal = caller.principal();

    let mut task = state
        .store
        .tasks
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found"))?;

    ensure(
        can_edit_task(&principal, &task),
        "You can only edit tasks assigned to you or tasks you created",
    )?;

    let update = restrict_task_update(&principal, &task, payload);
    if let Some(assignee) = update.assigned_to {
        if assignee != task.assigned_to {
            ensure_assignee_exists(&state.store, assignee).await?;
        }
    }

    let is_assignee = task.assigned_to == caller.id();
    let changes = json!({
        "status": update.status,
        "priority": update.priority,
        "assignedTo": update.assigned_to,
        "title": update.title,
    });
    update.apply_to(&mut task);
    state.store.tasks.put(task.clone()).await?;

    audit::record(
        AuditAction::UpdateTask,
        caller.id(),
        Some(id),
        json!({ "changes": changes, "isAssignee": is_assignee }),
    );

    Ok(Json(task))
}

async fn ensure_assignee_exists(store: &RecordStore, assignee: u64) -> AppResult<()> {
    if store.team_members.get(assignee).await?.is_none() {
        tracing::debug!(assignee, "task assignee not found among team members");
        return Err(AppError::bad_request("Assigned team member not found"));
    }
    Ok(())
}
