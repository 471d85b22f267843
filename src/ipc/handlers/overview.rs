use crate::export;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::student_json;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_metrics(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let summary = export::summarize(dataset, &state.thresholds);
    ok(
        &req.id,
        json!({
            "totalStudents": summary.total,
            "averageMarks": summary.average_marks,
            "averageAttendance": summary.average_attendance,
            "averageLogins": summary.average_logins,
        }),
    )
}

/// Full table with derived Risk; `last` narrows to the trailing N rows for
/// the dataset-preview panel.
fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let last = req
        .params
        .get("last")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize);

    let records = dataset.records();
    let start = match last {
        Some(n) if n < records.len() => records.len() - n,
        _ => 0,
    };
    let students: Vec<_> = records[start..]
        .iter()
        .map(|r| student_json(r, &state.thresholds))
        .collect();
    ok(
        &req.id,
        json!({
            "students": students,
            "totalStudents": records.len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "overview.metrics" => Some(handle_metrics(state, req)),
        "dataset.list" => Some(handle_list(state, req)),
        _ => None,
    }
}
