mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::Value;

use common::spawn_app;

#[test]
fn openapi_has_camel_case_task_fields() -> anyhow::Result<()> {
    // Build the OpenAPI document the same way the server does
    let doc = team_dashboard::docs::build_openapi(8000);
    let v = serde_json::to_value(&doc)?;

    // Navigate to components.schemas.Task.properties
    let props = v
        .get("components")
        .and_then(Value::as_object)
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .and_then(|s| s.get("Task"))
        .and_then(Value::as_object)
        .and_then(|t| t.get("properties"))
        .and_then(Value::as_object)
        .expect("components.schemas.Task.properties must exist");

    let keys = ["assignedTo", "priority", "status", "createdBy", "dueDate"];
    for k in &keys {
        assert!(props.contains_key(*k), "OpenAPI Task schema missing '{}'", k);
    }

    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let app = spawn_app().await?;

    let (status, doc) = app.send(Method::GET, "/api-docs/openapi.json", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/tasks").is_some());
    assert!(doc["paths"].get("/api/auth/change-password").is_some());

    Ok(())
}
