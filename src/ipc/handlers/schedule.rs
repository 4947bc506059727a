use crate::export;
use crate::ipc::helpers::{
    db_conn, opt_i64, opt_list, opt_str, required_list, required_str, respond, HandlerErr,
    HandlerResult,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{ScheduleRow, TimetableEntry};
use crate::{planner, store, views};
use rusqlite::Connection;
use serde_json::json;
use std::path::PathBuf;

/// The active teacher's log, optionally narrowed to one week.
fn teacher_log(conn: &Connection, week: Option<i64>) -> store::Result<Vec<ScheduleRow>> {
    let teacher = store::load_teacher_name(conn)?;
    let rows = views::teacher_rows(&store::load_schedule(conn)?, &teacher);
    Ok(match week {
        Some(w) => rows.into_iter().filter(|r| r.week == w).collect(),
        None => rows,
    })
}

fn handle_schedule_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let week = opt_i64(req, "week")?;
    Ok(json!({ "rows": teacher_log(conn, week)? }))
}

fn handle_schedule_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let rows: Vec<ScheduleRow> = required_list(req, "rows")?;
    let updated = planner::update_schedule(conn, rows)?;
    Ok(json!({ "rows": updated.rows, "equipment": updated.equipment }))
}

fn handle_schedule_preview(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let week = opt_i64(req, "week")?;
    let start = opt_str(req, "weekStartDate")?;
    let entries: Vec<TimetableEntry> = opt_list(req, "entries")?;
    let rows = planner::preview_week(conn, week, start.as_deref(), &entries)?;
    Ok(json!({ "rows": rows }))
}

fn handle_schedule_export_csv(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let out_path = PathBuf::from(required_str(req, "outPath")?);
    let week = match opt_i64(req, "week")? {
        Some(w) => w,
        None => store::load_current_week(conn)?,
    };
    let rows = teacher_log(conn, Some(week))?;
    export::write_sheet(&out_path, &export::schedule_csv(&rows))
        .map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?;
    tracing::info!(path = %out_path.display(), week, rows = rows.len(), "exported teaching log");
    Ok(json!({ "rowCount": rows.len(), "path": out_path.to_string_lossy() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "schedule.list" => handle_schedule_list(state, req),
        "schedule.update" => handle_schedule_update(state, req),
        "schedule.preview" => handle_schedule_preview(state, req),
        "schedule.exportCsv" => handle_schedule_export_csv(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
