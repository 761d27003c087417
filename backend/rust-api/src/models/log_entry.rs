use serde::{Deserialize, Serialize};

use super::quiz::{QuizRecord, RequestEcho};

/// One request/response round trip as persisted in the daily log file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    #[serde(rename = "aiReq")]
    pub request: RequestEcho,
    #[serde(rename = "aiRes")]
    pub response: QuizRecord,
    #[serde(rename = "aiStartTime")]
    pub start_time: String,
    #[serde(rename = "aiEndTime")]
    pub end_time: String,
    #[serde(rename = "aiCostTime")]
    pub cost_seconds: f64,
}
