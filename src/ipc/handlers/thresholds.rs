use crate::ipc::error::ok;
use crate::ipc::helpers::{bad_params, require_percent};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn thresholds_json(state: &AppState) -> serde_json::Value {
    json!({
        "highRiskCutoff": state.thresholds.high_risk_cutoff,
        "mediumRiskCutoff": state.thresholds.medium_risk_cutoff,
        "attendanceCutoff": state.thresholds.attendance_cutoff,
    })
}

/// Partial updates allowed; each supplied cutoff must be 0-100. Thresholds
/// are daemon state only and are never written to the dataset file.
fn handle_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut next = state.thresholds;
    for (key, slot) in [
        ("highRiskCutoff", &mut next.high_risk_cutoff),
        ("mediumRiskCutoff", &mut next.medium_risk_cutoff),
        ("attendanceCutoff", &mut next.attendance_cutoff),
    ] {
        match req.params.get(key) {
            None => {}
            Some(v) => {
                let Some(n) = v.as_f64() else {
                    return bad_params(format!("{} must be numeric", key)).response(&req.id);
                };
                match require_percent(key, n) {
                    Ok(n) => *slot = n,
                    Err(e) => return e.response(&req.id),
                }
            }
        }
    }
    state.thresholds = next;
    log::info!(
        "thresholds set to high={} medium={} attendance={}",
        next.high_risk_cutoff,
        next.medium_risk_cutoff,
        next.attendance_cutoff
    );
    ok(&req.id, thresholds_json(state))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "thresholds.get" => Some(ok(&req.id, thresholds_json(state))),
        "thresholds.set" => Some(handle_set(state, req)),
        _ => None,
    }
}
