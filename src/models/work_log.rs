use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only time entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkLog {
    pub id: u64,
    pub member_id: u64,
    pub logged_by: u64,
    #[schema(example = 2.5)]
    pub hours: f64,
    #[schema(example = "Regression suite")]
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl crate::store::Record for WorkLog {
    const COLLECTION: &'static str = "work-logs";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogCreateRequest {
    /// Defaults to the caller when omitted.
    pub member_id: Option<u64>,
    pub hours: Option<f64>,
    pub activity: Option<String>,
    pub category: Option<String>,
}

/// Work log as listed to clients, with the member's display name attached.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogView {
    #[serde(flatten)]
    pub log: WorkLog,
    pub member_name: String,
}
