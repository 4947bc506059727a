use crate::export;
use crate::ipc::helpers::{
    db_conn, opt_i64, required_list, required_str, respond, HandlerErr, HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::EquipmentRow;
use crate::{planner, store, views};
use rusqlite::Connection;
use serde_json::json;
use std::path::PathBuf;

fn teacher_sheet(conn: &Connection, week: Option<i64>) -> store::Result<Vec<EquipmentRow>> {
    let teacher = store::load_teacher_name(conn)?;
    let rows = views::teacher_rows(&store::load_equipment(conn)?, &teacher);
    Ok(match week {
        Some(w) => rows.into_iter().filter(|r| r.week == w).collect(),
        None => rows,
    })
}

fn handle_equipment_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let week = opt_i64(req, "week")?;
    Ok(json!({ "rows": teacher_sheet(conn, week)? }))
}

fn handle_equipment_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let rows: Vec<EquipmentRow> = required_list(req, "rows")?;
    let updated = planner::update_equipment(conn, rows)?;
    Ok(json!({ "rows": updated }))
}

fn handle_equipment_export_csv(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let out_path = PathBuf::from(required_str(req, "outPath")?);
    let week = match opt_i64(req, "week")? {
        Some(w) => w,
        None => store::load_current_week(conn)?,
    };
    let rows: Vec<EquipmentRow> = teacher_sheet(conn, Some(week))?
        .into_iter()
        .filter(|r| !r.equipment_name.trim().is_empty())
        .collect();
    export::write_sheet(&out_path, &export::equipment_csv(&rows))
        .map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?;
    tracing::info!(path = %out_path.display(), week, rows = rows.len(), "exported equipment sheet");
    Ok(json!({ "rowCount": rows.len(), "path": out_path.to_string_lossy() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "equipment.list" => handle_equipment_list(state, req),
        "equipment.update" => handle_equipment_update(state, req),
        "equipment.exportCsv" => handle_equipment_export_csv(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
