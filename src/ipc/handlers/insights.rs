use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{bad_params, student_json};
use crate::ipc::types::{AppState, Request};
use crate::risk::{classify, RiskTier};
use serde_json::json;

fn handle_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let query = match req.params.get("query").and_then(|v| v.as_str()) {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return bad_params("missing query").response(&req.id),
    };

    let matches: Vec<_> = dataset
        .search(&query)
        .into_iter()
        .map(|r| student_json(r, &state.thresholds))
        .collect();
    // An empty result here is ordinary; only the removal flow escalates it.
    ok(
        &req.id,
        json!({
            "count": matches.len(),
            "students": matches,
        }),
    )
}

/// The fixed reporting buckets from the dashboard: top (>90), average
/// (40-90), struggling (<40), plus the tier distribution.
fn handle_groups(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };

    let mut top = Vec::new();
    let mut average = Vec::new();
    let mut struggling = Vec::new();
    let mut high = 0usize;
    let mut medium = 0usize;
    let mut low = 0usize;
    for r in dataset.records() {
        let row = student_json(r, &state.thresholds);
        if r.marks > 90.0 {
            top.push(row);
        } else if r.marks >= 40.0 {
            average.push(row);
        } else {
            struggling.push(row);
        }
        match classify(r.marks, r.attendance, &state.thresholds) {
            RiskTier::High => high += 1,
            RiskTier::Medium => medium += 1,
            RiskTier::Low => low += 1,
        }
    }

    ok(
        &req.id,
        json!({
            "top": top,
            "average": average,
            "struggling": struggling,
            "riskDistribution": {
                "High Risk": high,
                "Medium Risk": medium,
                "Low Risk": low,
            },
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "insights.search" => Some(handle_search(state, req)),
        "insights.groups" => Some(handle_groups(state, req)),
        _ => None,
    }
}
