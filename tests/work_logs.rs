mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{spawn_app, ADMIN, ANALYST};

#[tokio::test]
async fn employees_log_only_for_themselves() -> Result<()> {
    let app = spawn_app().await?;
    let analyst = app.login(ANALYST).await?;

    let (status, body) = app
        .post("/api/work-logs", Some(&analyst), json!({ "memberId": 2, "hours": 2, "activity": "Pairing" }))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, log) = app
        .post("/api/work-logs", Some(&analyst), json!({ "hours": 1.5, "activity": "Exploratory testing", "category": "testing" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["memberId"], 3);
    assert_eq!(log["loggedBy"], 3);
    assert_eq!(log["hours"], 1.5);
    assert!(log["date"].is_string());
    assert!(log["timestamp"].is_string());

    Ok(())
}

#[tokio::test]
async fn admins_log_for_existing_members_only() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;

    let (status, log) = app
        .post("/api/work-logs", Some(&admin), json!({ "memberId": 3, "hours": 4, "activity": "Test plan review" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["memberId"], 3);
    assert_eq!(log["loggedBy"], 1);

    let (status, body) = app
        .post("/api/work-logs", Some(&admin), json!({ "memberId": 999, "hours": 4, "activity": "Ghost work" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Target user not found");

    Ok(())
}

#[tokio::test]
async fn hours_and_activity_are_validated() -> Result<()> {
    let app = spawn_app().await?;
    let analyst = app.login(ANALYST).await?;

    for payload in [
        json!({ "hours": 0, "activity": "Nothing" }),
        json!({ "hours": -2, "activity": "Negative" }),
        json!({ "activity": "No hours" }),
        json!({ "hours": 1, "activity": "  " }),
    ] {
        let (status, _) = app.post("/api/work-logs", Some(&analyst), payload).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    assert!(app.state.store.work_logs.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn listings_are_scoped_and_carry_member_names() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;
    let analyst = app.login(ANALYST).await?;

    app.post("/api/work-logs", Some(&admin), json!({ "memberId": 2, "hours": 3, "activity": "Planning" }))
        .await?;
    app.post("/api/work-logs", Some(&analyst), json!({ "hours": 2, "activity": "Regression" }))
        .await?;

    let (status, all) = app.get("/api/work-logs", &admin).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().map(Vec::len), Some(2));
    assert_eq!(all[0]["memberName"], "Sarah Wilson");

    let (_, mine) = app.get("/api/work-logs", &analyst).await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["memberId"], 3);
    assert_eq!(mine[0]["memberName"], "Mike Johnson");

    Ok(())
}
