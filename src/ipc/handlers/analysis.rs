use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::stats;
use serde_json::json;

const METRIC_COLUMNS: [&str; 3] = ["Marks", "Attendance", "Logins"];

/// Pearson matrix over the three numeric columns. Entries are null when a
/// column has no variance (or fewer than two rows).
fn handle_correlation(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };

    let records = dataset.records();
    let columns: [Vec<f64>; 3] = [
        records.iter().map(|r| r.marks).collect(),
        records.iter().map(|r| r.attendance).collect(),
        records.iter().map(|r| r.logins as f64).collect(),
    ];

    let matrix: Vec<Vec<serde_json::Value>> = (0..3)
        .map(|i| {
            (0..3)
                .map(|j| match stats::pearson(&columns[i], &columns[j]) {
                    Some(v) => json!(v),
                    None => serde_json::Value::Null,
                })
                .collect()
        })
        .collect();

    ok(
        &req.id,
        json!({
            "columns": METRIC_COLUMNS,
            "matrix": matrix,
        }),
    )
}

/// Average marks per attendance band, the absentee-impact view.
fn handle_attendance_impact(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };

    let rows: Vec<(f64, f64)> = dataset
        .records()
        .iter()
        .map(|r| (r.attendance, r.marks))
        .collect();
    let averages = stats::attendance_impact(&rows);
    let mut counts = [0usize; 6];
    for (attendance, _) in &rows {
        counts[stats::attendance_band(*attendance)] += 1;
    }

    let bands: Vec<_> = stats::ATTENDANCE_BANDS
        .iter()
        .enumerate()
        .map(|(i, band)| {
            json!({
                "band": band,
                "students": counts[i],
                "averageMarks": averages[i],
            })
        })
        .collect();
    ok(&req.id, json!({ "bands": bands }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analysis.correlation" => Some(handle_correlation(state, req)),
        "analysis.attendanceImpact" => Some(handle_attendance_impact(state, req)),
        _ => None,
    }
}
