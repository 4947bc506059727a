use crate::backup;
use crate::ipc::handlers::core::open_workspace;
use crate::ipc::helpers::{required_str, respond, HandlerErr, HandlerResult};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(workspace) = state.workspace.clone() else {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    };
    let out_path = PathBuf::from(required_str(req, "outPath")?);
    let summary = backup::export_workspace_bundle(&workspace, &out_path)
        .map_err(|e| HandlerErr::new("backup_failed", format!("{e:#}")))?;
    tracing::info!(path = %out_path.display(), "exported workspace bundle");
    Ok(json!({
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "checksum": summary.checksum,
    }))
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(workspace) = state.workspace.clone() else {
        return Err(HandlerErr::new("no_workspace", "select a workspace first"));
    };
    let in_path = PathBuf::from(required_str(req, "inPath")?);

    // Release the database file before it is replaced.
    state.db = None;
    let summary = backup::import_workspace_bundle(&in_path, &workspace)
        .map_err(|e| HandlerErr::new("backup_failed", format!("{e:#}")));
    let reopened = open_workspace(state, &workspace)
        .map_err(|e| HandlerErr::new("db_open_failed", format!("{e:#}")));
    let summary = summary?;
    reopened?;

    tracing::info!(path = %in_path.display(), format = %summary.bundle_format_detected, "imported workspace bundle");
    Ok(json!({
        "bundleFormatDetected": summary.bundle_format_detected,
        "workspacePath": workspace.to_string_lossy(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "backup.export" => handle_backup_export(state, req),
        "backup.import" => handle_backup_import(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
