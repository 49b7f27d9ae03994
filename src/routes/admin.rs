use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::app::AppState;
use crate::audit::{self, AuditAction};
use crate::auth::AuthUser;
use crate::authz::{can_manage_team, legacy_for_tier, Tier};
use crate::errors::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::models::team_member::TeamMember;
use crate::models::user::{RegisterEmployeeRequest, RegisterEmployeeResponse, RegisteredEmployee, User};
use crate::routes::{ensure, ensure_email_available, ensure_employee_id_available, non_blank};
use crate::utils::{hash_password, today, validate_password};

#[utoipa::path(
    post,
    path = "/api/admin/register-employee",
    tag = "Admin",
    security(("bearerAuth" = [])),
    request_body = RegisterEmployeeRequest,
    responses(
        (status = 200, description = "Employee registered", body = RegisterEmployeeResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email or employee id already in use")
    )
)]
pub async fn register_employee(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<RegisterEmployeeRequest>,
) -> AppResult<Json<RegisterEmployeeResponse>> {
    ensure(can_manage_team(caller.user.position), "Only admins can register employees")?;

    let RegisterEmployeeRequest {
        email,
        password,
        name,
        role,
        position,
        availability,
        phone,
        emergency_contact,
        address,
        city,
        state: region,
        zipcode,
        employee_id,
        join_date,
        department,
        employment_type,
        skills,
        education,
        experience,
        certifications,
    } = payload;

    let email = non_blank(email);
    let password = password.filter(|p| !p.is_empty());
    let name = non_blank(name);
    let role = non_blank(role);
    let position = non_blank(position);
    let phone = non_blank(phone);
    let emergency_contact = non_blank(emergency_contact);
    let employee_id = non_blank(employee_id);
    let department = non_blank(department);
    let employment_type = non_blank(employment_type);

    let missing: Vec<&str> = [
        ("email", email.is_none()),
        ("password", password.is_none()),
        ("name", name.is_none()),
        ("role", role.is_none()),
        ("position", position.is_none()),
        ("phone", phone.is_none()),
        ("emergencyContact", emergency_contact.is_none()),
        ("employeeId", employee_id.is_none()),
        ("joinDate", join_date.is_none()),
        ("department", department.is_none()),
        ("employmentType", employment_type.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (
        Some(email),
        Some(password),
        Some(name),
        Some(role),
        Some(position),
        Some(phone),
        Some(emergency_contact),
        Some(employee_id),
        Some(join_date),
        Some(department),
        Some(employment_type),
    ) = (
        email,
        password,
        name,
        role,
        position,
        phone,
        emergency_contact,
        employee_id,
        join_date,
        department,
        employment_type,
    )
    else {
        return Err(AppError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    validate_password(&password)?;
    let tier: Tier = position
        .parse()
        .map_err(|_| AppError::bad_request("Invalid position selected"))?;

    let email = email.to_ascii_lowercase();
    let team_id = caller.user.team_id.unwrap_or(state.config.default_team_id);
    let password_hash = hash_password(&password)?;

    let user = User {
        id: 0,
        email: email.clone(),
        password_hash,
        name: name.clone(),
        role: role.clone(),
        position: legacy_for_tier(tier, &role).into(),
        team_id: Some(team_id),
        created_date: Some(today()),
        is_active: true,
        needs_password_reset: true,
    };

    let member = TeamMember {
        availability: availability.unwrap_or_default(),
        team_id: Some(team_id),
        join_date: Some(join_date),
        phone: Some(phone),
        emergency_contact: Some(emergency_contact),
        address,
        city,
        state: region,
        zipcode,
        employee_id: Some(employee_id.clone()),
        department: Some(department),
        employment_type: Some(employment_type),
        skills,
        education,
        experience: Some(experience.unwrap_or(0)),
        certifications,
        ..TeamMember::new(0, name, email, role)
    };

    let (user, _member) = {
        let _guard = state.store.lock_pairing().await;
        ensure_email_available(&state.store, &user.email, None).await?;
        ensure_employee_id_available(&state.store, &employee_id).await?;
        state.store.create_user_with_profile(user, member).await?
    };

    audit::record(
        AuditAction::AdminRegisterEmployee,
        caller.id(),
        Some(user.id),
        json!({
            "employeeEmail": user.email,
            "employeeRole": user.role,
            "employeePosition": user.position.as_str(),
            "employeeId": employee_id,
        }),
    );

    Ok(Json(RegisterEmployeeResponse {
        success: true,
        message: "Employee registered successfully".to_string(),
        employee: RegisteredEmployee {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            position: tier,
            employee_id,
        },
    }))
}
