mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{spawn_app, ADMIN, ANALYST};

#[tokio::test]
async fn employee_analytics_are_scoped_but_team_counts_are_global() -> Result<()> {
    let app = spawn_app().await?;
    let admin = app.login(ADMIN).await?;
    let analyst = app.login(ANALYST).await?;

    app.post(
        "/api/tasks",
        Some(&admin),
        json!({ "title": "Payments", "assignedTo": 3, "priority": "high", "dueDate": "2030-02-01" }),
    )
    .await?;
    app.post("/api/work-logs", Some(&admin), json!({ "memberId": 2, "hours": 5, "activity": "Planning" }))
        .await?;
    for hours in [1, 2] {
        app.post("/api/work-logs", Some(&analyst), json!({ "hours": hours, "activity": "Regression" }))
            .await?;
    }

    let (status, mine) = app.get("/api/analytics", &analyst).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["totalTeamMembers"], 4);
    assert_eq!(mine["availableMembers"], 3);
    assert_eq!(mine["totalTasks"], 1);
    assert_eq!(mine["completedTasks"], 0);
    assert_eq!(mine["totalHoursLogged"], 3.0);
    assert_eq!(mine["userPosition"], "Employee");
    assert_eq!(mine["userPermissions"]["canManageTeam"], false);
    assert_eq!(mine["recentActivity"].as_array().map(Vec::len), Some(2));
    // newest first
    assert_eq!(mine["recentActivity"][0]["hours"], 2.0);

    let (_, all) = app.get("/api/analytics", &admin).await?;
    assert_eq!(all["totalTeamMembers"], 4);
    assert_eq!(all["totalTasks"], 3);
    assert_eq!(all["totalHoursLogged"], 8.0);
    assert_eq!(all["userPosition"], "Admin");
    assert_eq!(all["userPermissions"]["canViewAllData"], true);
    assert_eq!(all["recentActivity"][2]["memberName"], "Sarah Wilson");

    Ok(())
}
