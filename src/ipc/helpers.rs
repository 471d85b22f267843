use serde_json::{json, Value};

use crate::ipc::error::err;
use crate::risk::{classify, Thresholds};
use crate::store::StudentRecord;

pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn bad_params(message: impl Into<String>) -> HandlerErr {
    HandlerErr::new("bad_params", message)
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| bad_params(format!("missing {}", key)))
}

pub fn get_required_f64(params: &Value, key: &str) -> Result<f64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| bad_params(format!("missing or non-numeric {}", key)))
}

pub fn get_required_i64(params: &Value, key: &str) -> Result<i64, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| bad_params(format!("missing or non-integer {}", key)))
}

/// Percent-scale fields (marks, attendance, the three cutoffs) all share the
/// same 0-100 domain.
pub fn require_percent(key: &str, value: f64) -> Result<f64, HandlerErr> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(bad_params(format!("{} must be between 0 and 100", key)))
    }
}

/// Row shape shared by every listing surface; Risk is derived here, at read
/// time, against the current thresholds.
pub fn student_json(r: &StudentRecord, thresholds: &Thresholds) -> Value {
    json!({
        "studentId": r.student_id,
        "name": r.name,
        "marks": r.marks,
        "attendance": r.attendance,
        "logins": r.logins,
        "risk": classify(r.marks, r.attendance, thresholds).label(),
    })
}
