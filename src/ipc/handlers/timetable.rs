use crate::ipc::helpers::{db_conn, opt_list, opt_str, required_list, respond, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::model::TimetableEntry;
use crate::{planner, store};
use serde_json::json;

fn handle_timetable_get(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let entries = store::load_timetable(conn)?;
    let file_name = store::load_timetable_file(conn)?;
    Ok(json!({ "entries": entries, "fileName": file_name }))
}

fn handle_timetable_import(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let entries: Vec<TimetableEntry> = required_list(req, "entries")?;
    let file_name = opt_str(req, "fileName")?;
    let imported = planner::import_timetable(conn, &entries, file_name.as_deref())?;
    Ok(json!({
        "entryCount": imported.entry_count,
        "subjects": imported.subjects,
        "classes": imported.classes,
        "generatedRows": imported.generated_rows,
    }))
}

fn handle_timetable_apply(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let entries: Vec<TimetableEntry> = opt_list(req, "entries")?;
    let applied = planner::apply_timetable(conn, &entries)?;
    Ok(json!({
        "teacherName": applied.teacher_name,
        "week": applied.week,
        "rows": applied.rows,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "timetable.get" => handle_timetable_get(state, req),
        "timetable.import" => handle_timetable_import(state, req),
        "timetable.apply" => handle_timetable_apply(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
