use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::docs;
use crate::errors::AppResult;
use crate::reconcile::{reconcile, ReconcileOptions};
use crate::routes::{admin, analytics, auth, health, tasks, team_members, work_logs};
use crate::session::{ResetCodes, SessionRegistry};
use crate::store::seed::seed_demo_data;
use crate::store::RecordStore;
use crate::utils::today;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: RecordStore,
    pub sessions: SessionRegistry,
    pub reset_codes: Arc<ResetCodes>,
}

impl AppState {
    pub fn new(config: AppConfig, store: RecordStore) -> Self {
        let sessions = SessionRegistry::in_memory(config.session_ttl_hours);
        Self {
            config: Arc::new(config),
            store,
            sessions,
            reset_codes: Arc::new(ResetCodes::default()),
        }
    }
}

/// Opens the data directory, seeds it on first start and runs the
/// user/profile reconciliation before any request is served.
pub async fn bootstrap(config: AppConfig) -> AppResult<AppState> {
    let store = RecordStore::open_json(&config.data_dir);
    prepare_store(&store, &config).await?;
    Ok(AppState::new(config, store))
}

pub async fn prepare_store(store: &RecordStore, config: &AppConfig) -> AppResult<()> {
    let today = today();

    if config.seed_demo_data && seed_demo_data(store, today).await? {
        tracing::info!(data_dir = %config.data_dir.display(), "initialized data directory with demo data");
    }

    reconcile(store, &ReconcileOptions::from_config(config, today)).await?;
    Ok(())
}

pub fn create_app(state: AppState) -> Router {
    let openapi = docs::build_openapi(state.config.port);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password));

    let admin_routes = Router::new().route("/register-employee", post(admin::register_employee));

    let team_member_routes = Router::new()
        .route("/", get(team_members::list_team_members).post(team_members::create_team_member))
        .route("/:id", put(team_members::update_team_member));

    let task_routes = Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route("/:id", put(tasks::update_task));

    let work_log_routes = Router::new().route("/", get(work_logs::list_work_logs).post(work_logs::create_work_log));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .nest("/team-members", team_member_routes)
        .nest("/tasks", task_routes)
        .nest("/work-logs", work_log_routes)
        .route("/analytics", get(analytics::get_analytics))
        .route("/health", get(health::health));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .merge(docs::openapi_routes(openapi))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
