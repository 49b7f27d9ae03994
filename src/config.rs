//! Runtime configuration, read from the environment (after `.env` has been
//! loaded by the binary).
//!
//! | Variable | Default |
//! |---|---|
//! | `DATA_DIR` | `data` |
//! | `APP_PORT` | `8000` |
//! | `SESSION_TTL_HOURS` | `24` (at most ten years) |
//! | `SESSION_SWEEP_SECS` | `300` |
//! | `DEFAULT_TEMP_PASSWORD` | `hello123` |
//! | `BOOTSTRAP_ADMIN_EMAIL` | `admin@qa-team.com` |
//! | `DEFAULT_TEAM_ID` | `1` |
//! | `RESET_CODE_POLICY` | `accept-any` |
//! | `SEED_DEMO_DATA` | `true` |

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::AppError;

/// Longest accepted session lifetime, ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366 * 10;

/// How `/api/auth/reset-password` treats the submitted reset code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCodePolicy {
    /// Any code (or none) is accepted. Demo behaviour.
    AcceptAny,
    /// The code must match the latest one issued for the email and be unexpired.
    Verify,
}

impl FromStr for ResetCodePolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accept-any" | "accept_any" | "demo" => Ok(Self::AcceptAny),
            "verify" | "strict" => Ok(Self::Verify),
            other => Err(AppError::configuration(format!(
                "RESET_CODE_POLICY must be `accept-any` or `verify`, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub session_ttl_hours: i64,
    pub session_sweep_secs: u64,
    /// Temporary password given to accounts created without one.
    pub default_temp_password: String,
    /// Account that never gets a team-member profile.
    pub bootstrap_admin_email: String,
    pub default_team_id: u64,
    pub reset_code_policy: ResetCodePolicy,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            port: 8000,
            session_ttl_hours: 24,
            session_sweep_secs: 300,
            default_temp_password: "hello123".to_string(),
            bootstrap_admin_email: "admin@qa-team.com".to_string(),
            default_team_id: 1,
            reset_code_policy: ResetCodePolicy::AcceptAny,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            data_dir: std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            port: parse_var("APP_PORT", defaults.port)?,
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
            session_sweep_secs: parse_var("SESSION_SWEEP_SECS", defaults.session_sweep_secs)?,
            default_temp_password: std::env::var("DEFAULT_TEMP_PASSWORD").unwrap_or(defaults.default_temp_password),
            bootstrap_admin_email: std::env::var("BOOTSTRAP_ADMIN_EMAIL")
                .map(|email| email.trim().to_ascii_lowercase())
                .unwrap_or(defaults.bootstrap_admin_email),
            default_team_id: parse_var("DEFAULT_TEAM_ID", defaults.default_team_id)?,
            reset_code_policy: match std::env::var("RESET_CODE_POLICY") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.reset_code_policy,
            },
            seed_demo_data: parse_bool("SEED_DEMO_DATA", defaults.seed_demo_data)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(AppError::configuration(format!(
                "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}"
            )));
        }
        if self.session_sweep_secs == 0 {
            return Err(AppError::configuration("SESSION_SWEEP_SECS must be positive"));
        }
        crate::utils::validate_password(&self.default_temp_password)
            .map_err(|_| AppError::configuration("DEFAULT_TEMP_PASSWORD is too short"))?;
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::configuration(format!("{name} must be a valid number"))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, AppError> {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::configuration(format!("{name} must be a boolean"))),
        },
        Err(_) => Ok(default),
    }
}
