pub mod admin;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod tasks;
pub mod team_members;
pub mod work_logs;

use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;

/// Fails with 403 and `message` unless `allowed`.
pub(crate) fn ensure(allowed: bool, message: &str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden(message))
    }
}

/// 409 if another account (other than `except_id`) already uses `email`.
pub(crate) async fn ensure_email_available(store: &RecordStore, email: &str, except_id: Option<u64>) -> AppResult<()> {
    let taken = store
        .users
        .list()
        .await?
        .iter()
        .any(|user| user.email_matches(email) && Some(user.id) != except_id);

    if taken {
        return Err(AppError::conflict("User with this email already exists"));
    }
    Ok(())
}

/// 409 if a profile already carries `employee_id`.
pub(crate) async fn ensure_employee_id_available(store: &RecordStore, employee_id: &str) -> AppResult<()> {
    let taken = store
        .team_members
        .list()
        .await?
        .iter()
        .any(|member| member.employee_id.as_deref() == Some(employee_id));

    if taken {
        return Err(AppError::conflict("Employee ID already exists"));
    }
    Ok(())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
