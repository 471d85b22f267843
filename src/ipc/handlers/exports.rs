use crate::export;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let out_path = match get_required_str(&req.params, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };

    match export::write_csv_snapshot(&out_path, dataset, &state.thresholds) {
        Ok(rows) => ok(
            &req.id,
            json!({
                "path": out_path.to_string_lossy(),
                "rows": rows,
                "mimeType": export::CSV_MIME,
            }),
        ),
        Err(e) => err(
            &req.id,
            "export_failed",
            format!("{e:#}"),
            Some(json!({ "path": out_path.to_string_lossy() })),
        ),
    }
}

fn handle_export_xlsx(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(dataset) = state.dataset.as_ref() else {
        return err(&req.id, "no_dataset", "open a dataset first", None);
    };
    let out_path = match get_required_str(&req.params, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };

    match export::write_xlsx_snapshot(&out_path, dataset, &state.thresholds) {
        Ok(rows) => ok(
            &req.id,
            json!({
                "path": out_path.to_string_lossy(),
                "rows": rows,
                "sheets": ["StudentData", "Summary"],
                "mimeType": export::XLSX_MIME,
            }),
        ),
        Err(e) => err(
            &req.id,
            "export_failed",
            format!("{e:#}"),
            Some(json!({ "path": out_path.to_string_lossy() })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.csv" => Some(handle_export_csv(state, req)),
        "export.xlsx" => Some(handle_export_xlsx(state, req)),
        _ => None,
    }
}
