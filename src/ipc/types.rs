use serde::Deserialize;

use crate::risk::Thresholds;
use crate::store::{Dataset, StudentRecord};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Deletion-in-progress state: the IDs surfaced by the last removal search.
/// Confirmation must name one of these exactly.
#[derive(Debug, Clone)]
pub struct RemovalSession {
    pub matched_ids: Vec<String>,
}

/// All daemon state. The staged admission and the removal session are held
/// here explicitly rather than as module globals.
pub struct AppState {
    pub dataset: Option<Dataset>,
    pub thresholds: Thresholds,
    pub pending: Option<StudentRecord>,
    pub removal: Option<RemovalSession>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            dataset: None,
            thresholds: Thresholds::default(),
            pending: None,
            removal: None,
        }
    }
}
