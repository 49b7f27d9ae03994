use std::time::Duration;

use team_dashboard::app::{bootstrap, create_app};
use team_dashboard::config::{AppConfig, ResetCodePolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env();
    init_tracing();

    let config = AppConfig::from_env()?;
    if config.reset_code_policy == ResetCodePolicy::AcceptAny {
        tracing::warn!("RESET_CODE_POLICY=accept-any: password resets accept any code, set `verify` outside demos");
    }

    let port = config.port;
    let sweep_every = Duration::from_secs(config.session_sweep_secs);

    let state = bootstrap(config).await?;
    let _sweeper = state.sessions.spawn_sweeper(sweep_every);

    let app = create_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
