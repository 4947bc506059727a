use crate::{db, planner};
use crate::ipc::helpers::{required_str, respond, HandlerErr, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, StoreError};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Opens (creating if needed) the workspace database and checks that every
/// stored list decodes. A corrupt slot keeps the workspace closed. The current
/// week is populated if the active teacher has no rows for it yet.
pub fn open_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    store::check_all(&conn)?;
    let generated = planner::ensure_week_populated(&conn)?;
    state.workspace = Some(path.to_path_buf());
    state.db = Some(conn);
    tracing::info!(workspace = %path.display(), generated, "workspace opened");
    Ok(())
}

fn handle_health(state: &mut AppState, _req: &Request) -> HandlerResult {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
    }))
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> HandlerResult {
    let path = PathBuf::from(required_str(req, "path")?);

    match open_workspace(state, &path) {
        Ok(()) => Ok(json!({ "workspacePath": path.to_string_lossy() })),
        Err(e) => match e.downcast::<StoreError>() {
            Ok(store_err) => Err(store_err.into()),
            Err(other) => Err(HandlerErr::new("db_open_failed", format!("{other:?}"))),
        },
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "health" => handle_health(state, req),
        "workspace.select" => handle_workspace_select(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
