//! Demo data written into an empty store.

use chrono::{Duration, NaiveDate};

use crate::authz::LegacyPosition;
use crate::errors::AppResult;
use crate::models::task::{Priority, Task, TaskStatus};
use crate::models::team_member::{Availability, TeamMember};
use crate::models::user::User;
use crate::store::RecordStore;
use crate::utils::hash_password;

const DEMO_TEAM_ID: u64 = 1;

struct DemoAccount {
    id: u64,
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: &'static str,
    position: LegacyPosition,
    team_id: Option<u64>,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        id: 1,
        email: "admin@qa-team.com",
        password: "admin123",
        name: "QA Administrator",
        role: "QA Manager",
        position: LegacyPosition::QaManager,
        team_id: None,
    },
    DemoAccount {
        id: 2,
        email: "lead@qa-team.com",
        password: "lead123",
        name: "Sarah Wilson",
        role: "QA Lead",
        position: LegacyPosition::TeamLead,
        team_id: Some(DEMO_TEAM_ID),
    },
    DemoAccount {
        id: 3,
        email: "analyst@qa-team.com",
        password: "analyst123",
        name: "Mike Johnson",
        role: "QA Analyst",
        position: LegacyPosition::RegularEmployee,
        team_id: Some(DEMO_TEAM_ID),
    },
];

/// Seeds demo accounts, profiles and tasks when the users collection is
/// empty. Returns whether anything was written.
///
/// Two of the profiles have no account on purpose; the startup
/// reconciliation gives them one with the temporary password.
pub async fn seed_demo_data(store: &RecordStore, today: NaiveDate) -> AppResult<bool> {
    if !store.users.list().await?.is_empty() {
        tracing::debug!("users present, skipping demo seed");
        return Ok(false);
    }

    let mut users = Vec::with_capacity(DEMO_ACCOUNTS.len());
    for account in DEMO_ACCOUNTS {
        users.push(User {
            id: account.id,
            email: account.email.to_string(),
            password_hash: hash_password(account.password)?,
            name: account.name.to_string(),
            role: account.role.to_string(),
            position: account.position.into(),
            team_id: account.team_id,
            created_date: Some(today),
            is_active: true,
            needs_password_reset: false,
        });
    }

    let members = demo_members(today);
    let tasks = demo_tasks(today);

    store.users.replace_all(users).await?;
    store.team_members.replace_all(members).await?;
    store.tasks.replace_all(tasks).await?;
    store.work_logs.replace_all(Vec::new()).await?;

    tracing::info!(accounts = DEMO_ACCOUNTS.len(), "demo data seeded");
    Ok(true)
}

fn demo_members(today: NaiveDate) -> Vec<TeamMember> {
    let member = |id: u64, name: &str, email: &str, role: &str, availability: Availability| TeamMember {
        team_id: Some(DEMO_TEAM_ID),
        join_date: Some(today),
        availability,
        ..TeamMember::new(id, name, email, role)
    };

    vec![
        member(2, "Sarah Wilson", "lead@qa-team.com", "QA Lead", Availability::Available),
        member(3, "Mike Johnson", "analyst@qa-team.com", "QA Analyst", Availability::Available),
        member(4, "John Doe", "john.doe@company.com", "Senior QA Engineer", Availability::Available),
        member(5, "Jane Smith", "jane.smith@company.com", "QA Analyst", Availability::Busy),
    ]
}

fn demo_tasks(today: NaiveDate) -> Vec<Task> {
    vec![
        Task {
            id: 1,
            title: "Test login functionality".to_string(),
            description: Some("Verify all login scenarios including edge cases".to_string()),
            assigned_to: 4,
            priority: Priority::High,
            status: TaskStatus::InProgress,
            created_by: Some(1),
            created_date: Some(today),
            due_date: Some(today + Duration::days(7)),
            comments: None,
        },
        Task {
            id: 2,
            title: "API endpoint testing".to_string(),
            description: Some("Test all REST API endpoints for proper responses".to_string()),
            assigned_to: 5,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            created_by: Some(1),
            created_date: Some(today),
            due_date: Some(today + Duration::days(14)),
            comments: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::verify_password;

    #[tokio::test]
    async fn seeds_only_an_empty_store() {
        let store = RecordStore::in_memory();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(seed_demo_data(&store, today).await.unwrap());
        assert!(!seed_demo_data(&store, today).await.unwrap());

        let users = store.users.list().await.unwrap();
        assert_eq!(users.len(), 3);
        assert!(verify_password("admin123", &users[0].password_hash).unwrap());
        assert_eq!(store.team_members.list().await.unwrap().len(), 4);
        assert_eq!(store.tasks.list().await.unwrap().len(), 2);
    }
}
