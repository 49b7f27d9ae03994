//! Startup integrity check keeping users and team-member profiles paired.
//!
//! Every profile must have an account with the same email, every account
//! (except the bootstrap admin) must have a profile, and a pair always
//! shares one id: the account's.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::authz::position_for_role;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::models::team_member::{Availability, TeamMember};
use crate::models::user::User;
use crate::store::RecordStore;
use crate::utils::hash_password;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub temp_password: String,
    pub bootstrap_admin_email: String,
    pub default_team_id: u64,
    pub today: NaiveDate,
}

impl ReconcileOptions {
    pub fn from_config(config: &AppConfig, today: NaiveDate) -> Self {
        Self {
            temp_password: config.default_temp_password.clone(),
            bootstrap_admin_email: config.bootstrap_admin_email.clone(),
            default_team_id: config.default_team_id,
            today,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub users_created: usize,
    pub members_created: usize,
    pub ids_realigned: usize,
    pub users_written: bool,
    pub members_written: bool,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        !self.users_written && !self.members_written
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Brings the two collections back into one-to-one correspondence and
/// writes only the collections that changed.
pub async fn reconcile(store: &RecordStore, options: &ReconcileOptions) -> AppResult<ReconcileReport> {
    let _guard = store.lock_pairing().await;

    let mut users = store.users.list().await?;
    let mut members = store.team_members.list().await?;
    let mut report = ReconcileReport::default();
    let mut temp_hash: Option<String> = None;

    // Accounts for profiles that have none.
    let mut user_emails: HashSet<String> = users.iter().map(|user| email_key(&user.email)).collect();
    let mut user_ids: HashSet<u64> = users.iter().map(|user| user.id).collect();

    for member in &members {
        let key = email_key(&member.email);
        if user_emails.contains(&key) {
            continue;
        }

        let id = if user_ids.contains(&member.id) {
            user_ids.iter().max().map_or(1, |max| max + 1)
        } else {
            member.id
        };

        let password_hash = match &temp_hash {
            Some(hash) => hash.clone(),
            None => {
                let hash = hash_password(&options.temp_password)?;
                temp_hash = Some(hash.clone());
                hash
            }
        };

        tracing::info!(email = %member.email, user_id = id, "created login account for team member");
        users.push(User {
            id,
            email: member.email.clone(),
            password_hash,
            name: member.name.clone(),
            role: member.role.clone(),
            position: position_for_role(&member.role).into(),
            team_id: Some(member.team_id.unwrap_or(options.default_team_id)),
            created_date: Some(member.join_date.unwrap_or(options.today)),
            is_active: true,
            needs_password_reset: true,
        });
        user_emails.insert(key);
        user_ids.insert(id);
        report.users_created += 1;
    }

    // Profiles follow their account's id.
    let id_by_email: HashMap<String, u64> = users.iter().map(|user| (email_key(&user.email), user.id)).collect();
    let mut claimed: HashSet<u64> = HashSet::new();

    for member in &mut members {
        let Some(&user_id) = id_by_email.get(&email_key(&member.email)) else {
            continue;
        };
        if !claimed.insert(user_id) {
            tracing::warn!(email = %member.email, member_id = member.id, "duplicate profile for account, left as is");
            continue;
        }
        if member.id != user_id {
            tracing::info!(email = %member.email, from = member.id, to = user_id, "realigned team member id");
            member.id = user_id;
            report.ids_realigned += 1;
        }
    }

    // Profiles for accounts that have none.
    let member_emails: HashSet<String> = members.iter().map(|member| email_key(&member.email)).collect();
    let bootstrap = email_key(&options.bootstrap_admin_email);

    for user in &users {
        let key = email_key(&user.email);
        if key == bootstrap || member_emails.contains(&key) {
            continue;
        }

        tracing::info!(email = %user.email, member_id = user.id, "created team member profile for user");
        members.push(TeamMember {
            availability: Availability::Available,
            team_id: Some(user.team_id.unwrap_or(options.default_team_id)),
            join_date: Some(user.created_date.unwrap_or(options.today)),
            ..TeamMember::new(user.id, user.name.clone(), user.email.clone(), user.role.clone())
        });
        report.members_created += 1;
    }

    if report.users_created > 0 {
        store.users.replace_all(users).await?;
        report.users_written = true;
    }
    if report.members_created > 0 || report.ids_realigned > 0 {
        store.team_members.replace_all(members).await?;
        report.members_written = true;
    }

    if report.is_clean() {
        tracing::info!("users and team members already in sync");
    } else {
        tracing::info!(
            users_created = report.users_created,
            members_created = report.members_created,
            ids_realigned = report.ids_realigned,
            "reconciliation finished"
        );
    }

    Ok(report)
}
