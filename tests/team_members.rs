mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{spawn_app, ADMIN, ANALYST};

#[tokio::test]
async fn reconciled_seed_accounts_can_log_in_with_temp_password() -> Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "john.doe@company.com", "password": "hello123" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], 4);
    assert_eq!(body["user"]["needsPasswordReset"], true);

    Ok(())
}

#[tokio::test]
async fn every_user_sees_the_full_team() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.login(ANALYST).await?;

    let (status, body) = app.get("/api/team-members", &token).await?;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = body
        .as_array()
        .map(|members| members.iter().filter_map(|m| m["id"].as_u64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![2, 3, 4, 5]);

    Ok(())
}

#[tokio::test]
async fn created_member_logs_in_with_temp_password_and_must_change_it() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;

    let (status, member) = app
        .post(
            "/api/team-members",
            Some(&admin),
            json!({ "name": "Priya Patel", "email": "Priya@Company.com", "role": "QA Analyst", "phone": "555-0101" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["email"], "priya@company.com");
    assert_eq!(member["teamId"], 1);
    assert_eq!(member["phone"], "555-0101");
    assert!(member["joinDate"].is_string());
    let id = member["id"].as_u64().unwrap_or_default();
    assert_eq!(id, 6);

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "priya@company.com", "password": "hello123" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id);
    assert_eq!(body["user"]["needsPasswordReset"], true);
    let temp_token = body["token"].as_str().unwrap_or_default().to_string();

    // until the password is changed only verify/change-password/logout work
    let (status, _) = app.get("/api/tasks", &temp_token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get("/api/auth/verify", &temp_token).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            "/api/auth/change-password",
            Some(&temp_token),
            json!({ "currentPassword": "hello123", "newPassword": "priya-secret" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["needsPasswordReset"], false);
    let token = body["token"].as_str().unwrap_or_default().to_string();

    let (status, _) = app.get("/api/tasks", &token).await?;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn member_creation_is_admin_only_and_rejects_duplicates() -> Result<()> {
    let app = spawn_app().await?;
    let analyst = app.login(ANALYST).await?;
    let admin = app.login(ADMIN).await?;

    let payload = json!({ "name": "New Person", "email": "new@company.com", "role": "QA Analyst" });
    let (status, _) = app.post("/api/team-members", Some(&analyst), payload.clone()).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/team-members", Some(&admin), json!({ "name": "No Email", "role": "QA Analyst" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/team-members",
            Some(&admin),
            json!({ "name": "Dup", "email": "ANALYST@qa-team.com", "role": "QA Analyst" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let users = app.state.store.users.list().await?;
    let members = app.state.store.team_members.list().await?;
    assert_eq!(users.len(), 5);
    assert_eq!(members.len(), 4);

    Ok(())
}

#[tokio::test]
async fn employee_profile_edits_skip_admin_fields() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.login(ANALYST).await?;

    let (status, body) = app
        .put(
            "/api/team-members/3",
            &token,
            json!({ "email": "hijack@example.com", "phone": "555-0199", "department": "Exec", "availability": "busy" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "analyst@qa-team.com");
    assert_eq!(body["phone"], "555-0199");
    assert_eq!(body["availability"], "busy");
    assert!(body.get("department").is_none());

    let (status, _) = app.put("/api/team-members/2", &token, json!({ "phone": "1" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn admin_profile_edits_follow_through_to_the_account() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;

    let (status, body) = app
        .put("/api/team-members/3", &admin, json!({ "name": "Michael Johnson", "email": "Mike@QA-team.com" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Michael Johnson");
    assert_eq!(body["email"], "mike@qa-team.com");

    let user = app.state.store.users.get(3).await?.expect("user 3 exists");
    assert_eq!(user.name, "Michael Johnson");
    assert_eq!(user.email, "mike@qa-team.com");
    app.login(("mike@qa-team.com", "analyst123")).await?;

    let (status, _) = app
        .put("/api/team-members/3", &admin, json!({ "email": "lead@qa-team.com" }))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.put("/api/team-members/999", &admin, json!({ "phone": "1" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn register_employee_creates_a_complete_pair() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;
    let analyst = app.login(ANALYST).await?;

    let payload = json!({
        "email": "Sam.Lee@Company.com",
        "password": "welcome1",
        "name": "Sam Lee",
        "role": "QA Manager",
        "position": "Admin",
        "phone": "555-0123",
        "emergencyContact": "Alex Lee",
        "employeeId": "EMP-100",
        "joinDate": "2024-06-03",
        "department": "Quality",
        "employmentType": "full-time",
        "experience": 7
    });

    let (status, _) = app.post("/api/admin/register-employee", Some(&analyst), payload.clone()).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/admin/register-employee", Some(&admin), payload.clone()).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["employee"]["position"], "Admin");
    assert_eq!(body["employee"]["email"], "sam.lee@company.com");
    let id = body["employee"]["id"].as_u64().unwrap_or_default();

    let member = app.state.store.team_members.get(id).await?.expect("profile created");
    assert_eq!(member.employee_id.as_deref(), Some("EMP-100"));
    assert_eq!(member.experience, Some(7));
    let user = app.state.store.users.get(id).await?.expect("account created");
    assert_eq!(user.position.as_str(), "QA Manager");
    assert!(user.needs_password_reset);

    let (status, _) = app.post("/api/admin/register-employee", Some(&admin), payload.clone()).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let mut same_employee_id = payload.clone();
    same_employee_id["email"] = json!("other@company.com");
    let (status, body) = app.post("/api/admin/register-employee", Some(&admin), same_employee_id).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Employee ID already exists");

    let mut bad_position = payload.clone();
    bad_position["email"] = json!("third@company.com");
    bad_position["employeeId"] = json!("EMP-101");
    bad_position["position"] = json!("Team Lead");
    let (status, body) = app.post("/api/admin/register-employee", Some(&admin), bad_position).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid position selected");

    let (status, body) = app
        .post("/api/admin/register-employee", Some(&admin), json!({ "email": "x@company.com", "name": "X" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.starts_with("Missing required fields: password, role, position"), "{message}");
    assert!(!message.contains("email"), "{message}");

    Ok(())
}

#[tokio::test]
async fn experience_sent_as_form_text_is_accepted() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;

    let (status, body) = app
        .post(
            "/api/admin/register-employee",
            Some(&admin),
            json!({
                "email": "riya@company.com",
                "password": "welcome1",
                "name": "Riya Patel",
                "role": "QA Analyst",
                "position": "Employee",
                "phone": "555-0199",
                "emergencyContact": "Dev Patel",
                "employeeId": "EMP-200",
                "joinDate": "2024-09-02",
                "department": "Quality",
                "employmentType": "full-time",
                "experience": "5"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["employee"]["id"].as_u64().unwrap_or_default();
    let member = app.state.store.team_members.get(id).await?.expect("profile created");
    assert_eq!(member.experience, Some(5));

    let (status, body) = app
        .put(&format!("/api/team-members/{id}"), &admin, json!({ "experience": "not sure" }))
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["experience"], 0);

    let (status, body) = app.put("/api/team-members/3", &admin, json!({ "experience": "8" })).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["experience"], 8);

    Ok(())
}
