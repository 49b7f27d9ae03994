use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::authz::{Position, Tier};

/// Login-capable identity as persisted in `users.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub position: Position,
    #[serde(default)]
    pub team_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub needs_password_reset: bool,
}

fn default_active() -> bool {
    true
}

impl crate::store::Record for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl User {
    pub fn tier(&self) -> Tier {
        self.position.tier()
    }

    pub fn email_matches(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Snapshot of a user captured when a session is issued. Positions are
/// already normalized to a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: u64,
    #[schema(example = "analyst@qa-team.com")]
    pub email: String,
    pub name: String,
    #[schema(example = "QA Analyst")]
    pub role: String,
    pub position: Tier,
    pub team_id: Option<u64>,
    pub needs_password_reset: bool,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            position: user.tier(),
            team_id: user.team_id,
            needs_password_reset: user.needs_password_reset,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "analyst@qa-team.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "analyst123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: SessionUser,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub temp_reset_code: String,
    pub note: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reset_code: Option<String>,
    #[serde(default)]
    pub new_password: String,
}

/// Admin-initiated registration of a complete employee record.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployeeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    #[schema(example = "QA Analyst")]
    pub role: Option<String>,
    #[schema(example = "Employee")]
    pub position: Option<String>,
    pub availability: Option<crate::models::team_member::Availability>,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub employee_id: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub department: Option<String>,
    pub employment_type: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    #[serde(default, deserialize_with = "crate::models::lenient_years")]
    #[schema(value_type = Option<u32>, example = 5)]
    pub experience: Option<u32>,
    pub certifications: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredEmployee {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub position: Tier,
    pub employee_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterEmployeeResponse {
    pub success: bool,
    pub message: String,
    pub employee: RegisteredEmployee,
}
