use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use team_dashboard::authz::Tier;
use team_dashboard::config::AppConfig;
use team_dashboard::reconcile::{reconcile, ReconcileOptions};
use team_dashboard::store::seed::seed_demo_data;
use team_dashboard::store::RecordStore;
use team_dashboard::utils::{hash_password, today};

#[derive(Parser, Debug)]
#[command(author, version, about = "team-dashboard admin tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pair every user with a team-member profile and realign ids
    Reconcile,
    /// Write the demo accounts, profiles and tasks into an empty data directory
    Seed,
    /// Print an argon2 hash for a password, for hand-edited data files
    HashPassword { password: String },
    /// Show record counts and unpaired accounts in the data directory
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
        Commands::Reconcile => {
            let config = AppConfig::from_env()?;
            let store = RecordStore::open_json(&config.data_dir);
            let report = reconcile(&store, &ReconcileOptions::from_config(&config, today())).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Seed => {
            let config = AppConfig::from_env()?;
            let store = RecordStore::open_json(&config.data_dir);
            if seed_demo_data(&store, today()).await? {
                println!("Seeded demo data into {}", config.data_dir.display());
            } else {
                println!("Users already present in {}, nothing seeded", config.data_dir.display());
            }
        }
        Commands::Status => {
            let config = AppConfig::from_env()?;
            print_status(&config).await?;
        }
    }

    Ok(())
}

async fn print_status(config: &AppConfig) -> anyhow::Result<()> {
    let store = RecordStore::open_json(&config.data_dir);

    let users = store.users.list().await.context("reading users")?;
    let members = store.team_members.list().await.context("reading team members")?;
    let tasks = store.tasks.list().await.context("reading tasks")?;
    let logs = store.work_logs.list().await.context("reading work logs")?;

    println!("Data directory: {}", config.data_dir.display());
    println!("{:<14} {:>6}", "collection", "count");
    println!("{:<14} {:>6}", "users", users.len());
    println!("{:<14} {:>6}", "team-members", members.len());
    println!("{:<14} {:>6}", "tasks", tasks.len());
    println!("{:<14} {:>6}", "work-logs", logs.len());

    let admins = users.iter().filter(|user| user.tier() == Tier::Admin).count();
    let pending = users.iter().filter(|user| user.needs_password_reset).count();
    println!("admins: {admins}, pending password changes: {pending}");

    let unpaired: Vec<&str> = users
        .iter()
        .filter(|user| !user.email_matches(&config.bootstrap_admin_email))
        .filter(|user| !members.iter().any(|member| member.id == user.id && member.email_matches(&user.email)))
        .map(|user| user.email.as_str())
        .collect();

    if unpaired.is_empty() {
        println!("All accounts are paired with a profile");
    } else {
        println!("Unpaired accounts (run `cli reconcile`):");
        for email in unpaired {
            println!("  {email}");
        }
    }

    Ok(())
}
