use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{
    get_required_f64, get_required_i64, get_required_str, require_percent, student_json,
};
use crate::ipc::types::{AppState, Request};
use crate::store::StudentRecord;
use serde_json::json;

/// Validates the admission form, assigns the next StudentID and stages the
/// record. Nothing touches the table until an explicit confirm.
fn handle_preview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };

    let name = match get_required_str(&req.params, "name") {
        Ok(v) => v.trim().to_string(),
        Err(e) => return e.response(&req.id),
    };
    if name.is_empty() {
        return err(&req.id, "name_required", "name is required", None);
    }
    let marks = match get_required_f64(&req.params, "marks").and_then(|v| require_percent("marks", v))
    {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let attendance = match get_required_f64(&req.params, "attendance")
        .and_then(|v| require_percent("attendance", v))
    {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let logins = match get_required_i64(&req.params, "logins") {
        Ok(v) if v >= 0 => v,
        Ok(_) => return err(&req.id, "bad_params", "logins must be non-negative", None),
        Err(e) => return e.response(&req.id),
    };

    if let Some(existing) = dataset.find_duplicate(&name, marks, attendance, logins) {
        log::warn!("rejected duplicate admission for {}", existing.student_id);
        return err(
            &req.id,
            "duplicate_record",
            "this student entry already exists",
            Some(json!({ "studentId": existing.student_id })),
        );
    }

    let record = StudentRecord {
        student_id: dataset.next_student_id(),
        name,
        marks,
        attendance,
        logins,
    };
    let preview = student_json(&record, &state.thresholds);
    state.pending = Some(record);
    ok(
        &req.id,
        json!({
            "student": preview,
            "pending": true,
        }),
    )
}

/// Appends the staged record and rewrites the backing file. If the save
/// fails the append is rolled back so the table and the file stay in step.
fn handle_confirm(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_mut() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let Some(mut record) = state.pending.take() else {
        return err(&req.id, "no_pending", "no staged student to confirm", None);
    };

    // The table may have changed since preview; keep the ID unique.
    if dataset.contains_id(&record.student_id) {
        record.student_id = dataset.next_student_id();
    }

    dataset.append(record.clone());
    if let Err(e) = dataset.save() {
        dataset.remove(&record.student_id);
        return err(&req.id, "save_failed", format!("{e:#}"), None);
    }

    log::info!("admitted {} ({})", record.student_id, record.name);
    ok(
        &req.id,
        json!({
            "student": student_json(&record, &state.thresholds),
            "totalStudents": dataset.len(),
        }),
    )
}

fn handle_cancel(state: &mut AppState, req: &Request) -> serde_json::Value {
    let cancelled = state.pending.take().is_some();
    ok(&req.id, json!({ "cancelled": cancelled }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "admission.preview" => Some(handle_preview(state, req)),
        "admission.confirm" => Some(handle_confirm(state, req)),
        "admission.cancel" => Some(handle_cancel(state, req)),
        _ => None,
    }
}
