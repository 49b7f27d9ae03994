use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::AuthUser;
use crate::authz::{can_edit_user, can_manage_team, position_for_role, restrict_profile_update};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::team_member::{TeamMember, TeamMemberUpdate};
use crate::models::user::User;
use crate::routes::{ensure, ensure_email_available, ensure_employee_id_available, non_blank};
use crate::utils::{hash_password, today};

#[utoipa::path(
    get,
    path = "/api/team-members",
    tag = "Team",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Every team member", body = [TeamMember]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_team_members(State(state): State<AppState>, caller: AuthUser) -> AppResult<Json<Vec<TeamMember>>> {
    let members = state.store.team_members.list().await?;
    audit::record(AuditAction::ViewAllTeamMembers, caller.id(), None, json!({}));
    Ok(Json(members))
}

/// Creates a profile together with its login account. The account gets the
/// configured temporary password and must change it on first login.
#[utoipa::path(
    post,
    path = "/api/team-members",
    tag = "Team",
    security(("bearerAuth" = [])),
    request_body = TeamMemberUpdate,
    responses(
        (status = 200, description = "Team member and account created", body = TeamMember),
        (status = 400, description = "Missing name, email or role"),
        (status = 403, description = "Caller cannot manage the team"),
        (status = 409, description = "Email or employee id already in use")
    )
)]
pub async fn create_team_member(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<TeamMemberUpdate>,
) -> AppResult<Json<TeamMember>> {
    ensure(can_manage_team(caller.user.position), "Only admins can add team members")?;

    let TeamMemberUpdate { name, email, role, .. } = payload.clone();
    let (Some(name), Some(email), Some(role)) = (non_blank(name), non_blank(email), non_blank(role)) else {
        return Err(AppError::bad_request("Name, email and role are required"));
    };
    let email = email.to_ascii_lowercase();
    let team_id = payload.team_id.unwrap_or(state.config.default_team_id);
    let employee_id = non_blank(payload.employee_id.clone());

    let mut member = TeamMember::new(0, name.clone(), email.clone(), role.clone());
    TeamMemberUpdate {
        name: None,
        email: None,
        role: None,
        employee_id: employee_id.clone(),
        ..payload
    }
    .apply_to(&mut member);
    member.team_id = Some(team_id);
    member.join_date = Some(today());

    let user = User {
        id: 0,
        email,
        password_hash: hash_password(&state.config.default_temp_password)?,
        name,
        role: role.clone(),
        position: position_for_role(&role).into(),
        team_id: Some(team_id),
        created_date: Some(today()),
        is_active: true,
        needs_password_reset: true,
    };

    let (_user, member) = {
        let _guard = state.store.lock_pairing().await;
        ensure_email_available(&state.store, &user.email, None).await?;
        if let Some(employee_id) = &employee_id {
            ensure_employee_id_available(&state.store, employee_id).await?;
        }
        state.store.create_user_with_profile(user, member).await?
    };

    audit::record(
        AuditAction::AddTeamMember,
        caller.id(),
        Some(member.id),
        json!({ "memberName": member.name, "teamId": team_id }),
    );

    Ok(Json(member))
}

/// Admins may change any field; everyone else only the non-administrative
/// fields of their own profile. Name, email and role changes are mirrored
/// onto the login account.
#[utoipa::path(
    put,
    path = "/api/team-members/{id}",
    tag = "Team",
    security(("bearerAuth" = [])),
    params(("id" = u64, Path, description = "Team member id (same as the user id)")),
    request_body = TeamMemberUpdate,
    responses(
        (status = 200, description = "Updated team member", body = TeamMember),
        (status = 403, description = "Caller may not edit this member"),
        (status = 404, description = "Team member not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_team_member(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<u64>,
    ApiJson(payload): ApiJson<TeamMemberUpdate>,
) -> AppResult<Json<TeamMember>> {
    let principal = caller.principal();
    ensure(
        can_edit_user(&principal, id),
        "You can only edit your own information",
    )?;

    let mut update = restrict_profile_update(&principal, payload);
    update.name = non_blank(update.name);
    update.email = non_blank(update.email).map(|email| email.to_ascii_lowercase());
    update.role = non_blank(update.role);

    let _guard = state.store.lock_pairing().await;

    let mut member = state
        .store
        .team_members
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("Team member not found"))?;

    if let Some(employee_id) = non_blank(update.employee_id.clone()) {
        if member.employee_id.as_deref() != Some(employee_id.as_str()) {
            ensure_employee_id_available(&state.store, &employee_id).await?;
        }
    }

    let account = if update.name.is_some() || update.email.is_some() || update.role.is_some() {
        synced_account(&state, &member, &update).await?
    } else {
        None
    };

    let previous = member.clone();
    let changed: Vec<&str> = changed_fields(&update);
    update.apply_to(&mut member);
    state.store.team_members.put(member.clone()).await?;

    if let Some(user) = account {
        if let Err(err) = state.store.users.put(user).await {
            tracing::warn!(member_id = id, error = %err, "account write failed, restoring profile");
            if let Err(rollback) = state.store.team_members.put(previous).await {
                tracing::error!(member_id = id, error = %rollback, "profile rollback failed");
            }
            return Err(err.into());
        }
    }

    audit::record(
        AuditAction::UpdateTeamMember,
        caller.id(),
        Some(id),
        json!({ "changes": changed, "isOwnData": caller.id() == id }),
    );

    Ok(Json(member))
}

/// The account paired with `member` with name, email and role copied over.
/// Nothing is written; `None` when the profile has no account.
async fn synced_account(state: &AppState, member: &TeamMember, update: &TeamMemberUpdate) -> AppResult<Option<User>> {
    let Some(mut user) = state.store.users.get(member.id).await? else {
        tracing::warn!(member_id = member.id, "profile has no paired account, skipping account sync");
        return Ok(None);
    };

    if let Some(email) = &update.email {
        ensure_email_available(&state.store, email, Some(user.id)).await?;
        user.email = email.clone();
    }
    if let Some(name) = &update.name {
        user.name = name.clone();
    }
    if let Some(role) = &update.role {
        user.role = role.clone();
    }

    Ok(Some(user))
}

fn changed_fields(update: &TeamMemberUpdate) -> Vec<&'static str> {
    let fields = [
        ("name", update.name.is_some()),
        ("email", update.email.is_some()),
        ("role", update.role.is_some()),
        ("availability", update.availability.is_some()),
        ("teamId", update.team_id.is_some()),
        ("joinDate", update.join_date.is_some()),
        ("phone", update.phone.is_some()),
        ("emergencyContact", update.emergency_contact.is_some()),
        ("address", update.address.is_some()),
        ("city", update.city.is_some()),
        ("state", update.state.is_some()),
        ("zipcode", update.zipcode.is_some()),
        ("employeeId", update.employee_id.is_some()),
        ("department", update.department.is_some()),
        ("employmentType", update.employment_type.is_some()),
        ("skills", update.skills.is_some()),
        ("education", update.education.is_some()),
        ("experience", update.experience.is_some()),
        ("certifications", update.certifications.is_some()),
    ];

    fields
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
}
