use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{bad_params, student_json};
use crate::ipc::types::{AppState, RemovalSession, Request};
use serde_json::json;

/// Stage one: substring search. A hit opens (or refreshes) the removal
/// session; no match is surfaced as an error and leaves no session behind.
fn handle_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let query = match req.params.get("query").and_then(|v| v.as_str()) {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return bad_params("missing query").response(&req.id),
    };

    let matches = dataset.search(&query);
    if matches.is_empty() {
        state.removal = None;
        return err(
            &req.id,
            "no_match",
            "no student found with that ID or name",
            None,
        );
    }

    let students: Vec<_> = matches
        .iter()
        .map(|r| student_json(r, &state.thresholds))
        .collect();
    state.removal = Some(RemovalSession {
        matched_ids: matches.iter().map(|r| r.student_id.clone()).collect(),
    });
    ok(
        &req.id,
        json!({
            "count": students.len(),
            "students": students,
        }),
    )
}

/// Stage two: the operator re-types the exact StudentID. It must be one of
/// the IDs the search surfaced; only then is the row permanently removed and
/// the file rewritten.
fn handle_confirm(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_mut() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let Some(session) = state.removal.as_ref() else {
        return err(
            &req.id,
            "no_removal_session",
            "search for a student before confirming a deletion",
            None,
        );
    };
    let student_id = match req.params.get("studentId").and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => return bad_params("missing studentId").response(&req.id),
    };

    if !session
        .matched_ids
        .iter()
        .any(|id| id.eq_ignore_ascii_case(&student_id))
    {
        return err(
            &req.id,
            "confirm_id_mismatch",
            "no matching StudentID found in the search results",
            None,
        );
    }

    let Some(removed) = dataset.remove(&student_id) else {
        state.removal = None;
        return err(&req.id, "not_found", "student no longer exists", None);
    };
    if let Err(e) = dataset.save() {
        dataset.append(removed);
        return err(&req.id, "save_failed", format!("{e:#}"), None);
    }

    state.removal = None;
    log::info!("deleted {} ({})", removed.student_id, removed.name);
    ok(
        &req.id,
        json!({
            "removed": {
                "studentId": removed.student_id,
                "name": removed.name,
            },
            "totalStudents": dataset.len(),
        }),
    )
}

fn handle_cancel(state: &mut AppState, req: &Request) -> serde_json::Value {
    let cancelled = state.removal.take().is_some();
    ok(&req.id, json!({ "cancelled": cancelled }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "removal.search" => Some(handle_search(state, req)),
        "removal.confirm" => Some(handle_confirm(state, req)),
        "removal.cancel" => Some(handle_cancel(state, req)),
        _ => None,
    }
}
