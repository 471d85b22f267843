use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use crate::store::Dataset;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "datasetPath": state
                .dataset
                .as_ref()
                .map(|d| d.path().to_string_lossy().to_string()),
            "students": state.dataset.as_ref().map(|d| d.len()),
        }),
    )
}

/// Opens (or with create:true, starts) the backing CSV. Any staged admission
/// or removal session belongs to the previous table and is dropped.
fn handle_dataset_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match get_required_str(&req.params, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };
    let create = req
        .params
        .get("create")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let dataset = if path.is_file() {
        match Dataset::load(&path) {
            Ok(d) => d,
            Err(e) => {
                return err(
                    &req.id,
                    "dataset_load_failed",
                    format!("{e:#}"),
                    Some(json!({ "path": path.to_string_lossy() })),
                )
            }
        }
    } else if create {
        Dataset::create(&path)
    } else {
        return err(
            &req.id,
            "dataset_not_found",
            format!("no dataset at {}", path.to_string_lossy()),
            None,
        );
    };

    let students = dataset.len();
    state.dataset = Some(dataset);
    state.pending = None;
    state.removal = None;
    ok(
        &req.id,
        json!({
            "datasetPath": path.to_string_lossy(),
            "students": students,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "dataset.open" => Some(handle_dataset_open(state, req)),
        _ => None,
    }
}
