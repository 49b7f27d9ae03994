use std::sync::Arc;

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::Server;
use utoipa::{Modify, OpenApi};

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::auth::login,
		routes::auth::verify,
		routes::auth::logout,
		routes::auth::change_password,
		routes::auth::forgot_password,
		routes::auth::reset_password,
		routes::admin::register_employee,
		routes::team_members::list_team_members,
		routes::team_members::create_team_member,
		routes::team_members::update_team_member,
		routes::tasks::list_tasks,
		routes::tasks::create_task,
		routes::tasks::update_task,
		routes::work_logs::list_work_logs,
		routes::work_logs::create_work_log,
		routes::analytics::get_analytics,
		routes::health::health
	),
	components(
		schemas(
			crate::authz::Tier,
			models::user::SessionUser,
			models::user::LoginRequest,
			models::user::AuthResponse,
			models::user::VerifyResponse,
			models::user::MessageResponse,
			models::user::ChangePasswordRequest,
			models::user::ForgotPasswordRequest,
			models::user::ForgotPasswordResponse,
			models::user::ResetPasswordRequest,
			models::user::RegisterEmployeeRequest,
			models::user::RegisteredEmployee,
			models::user::RegisterEmployeeResponse,
			models::team_member::Availability,
			models::team_member::TeamMember,
			models::team_member::TeamMemberUpdate,
			models::task::Priority,
			models::task::TaskStatus,
			models::task::Task,
			models::task::TaskCreateRequest,
			models::task::TaskUpdateRequest,
			models::work_log::WorkLog,
			models::work_log::WorkLogCreateRequest,
			models::work_log::WorkLogView,
			models::analytics::PermissionSummary,
			models::analytics::Analytics,
			routes::health::HealthResponse
		)
	),
	modifiers(&SecurityAddon),
	tags(
		(name = "Auth", description = "Login, sessions and passwords"),
		(name = "Admin", description = "Employee registration"),
		(name = "Team", description = "Team member profiles"),
		(name = "Tasks", description = "Task assignment and tracking"),
		(name = "Work logs", description = "Hour logging"),
		(name = "Analytics", description = "Dashboard aggregates"),
		(name = "Health", description = "Liveness")
	)
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by the handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
	fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
		let components = openapi.components.get_or_insert_with(Default::default);
		components.add_security_scheme(
			"bearerAuth",
			SecurityScheme::Http(
				HttpBuilder::new()
					.scheme(HttpAuthScheme::Bearer)
					.bearer_format("opaque")
					.description(Some("Session token returned by /api/auth/login"))
					.build(),
			),
		);
	}
}

pub fn build_openapi(port: u16) -> utoipa::openapi::OpenApi {
	let mut doc = ApiDoc::openapi();
	doc.servers = Some(vec![Server::new(format!("http://localhost:{port}"))]);
	doc
}

/// Serves the document at `/api-docs/openapi.json`.
pub fn openapi_routes(doc: utoipa::openapi::OpenApi) -> Router {
	let doc = Arc::new(doc);

	Router::new().route(
		"/api-docs/openapi.json",
		get(move || {
			let doc = Arc::clone(&doc);
			async move { Json((*doc).clone()) }
		}),
	)
}
