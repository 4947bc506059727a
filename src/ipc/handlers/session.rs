use crate::ipc::helpers::{db_conn, required_i64, required_str, required_text, respond, HandlerErr, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::model::AppTab;
use crate::{planner, store};
use serde_json::json;

fn handle_session_get(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let session = store::load_session(conn)?;
    Ok(json!({
        "teacherName": session.teacher_name,
        "currentWeek": session.current_week,
        "weekStartDate": session.week_start_date,
        "activeTab": session.active_tab,
        "timetableFile": session.timetable_file,
    }))
}

fn handle_teacher_set(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let name = required_text(req, "teacherName")?;
    let generated_rows = planner::set_teacher_name(conn, &name)?;
    Ok(json!({ "teacherName": name, "generatedRows": generated_rows }))
}

fn handle_week_change(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let week = required_i64(req, "week")?;
    let change = planner::change_week(conn, week)?;
    Ok(json!({
        "currentWeek": change.current_week,
        "weekStartDate": change.week_start_date,
        "generatedRows": change.generated_rows,
    }))
}

fn handle_week_set_start_date(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let date = required_str(req, "weekStartDate")?;
    store::save_week_start_date(conn, &date)?;
    Ok(json!({ "weekStartDate": date }))
}

fn handle_tab_set(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let raw = required_str(req, "tab")?;
    let tab = AppTab::parse(&raw).ok_or_else(|| {
        HandlerErr::bad_params(
            "tab must be one of: TIMETABLE, PPCT, DEVICE_LIST, SCHEDULE, EQUIPMENT",
        )
    })?;
    store::save_active_tab(conn, tab)?;
    Ok(json!({ "activeTab": tab }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "session.get" => handle_session_get(state, req),
        "teacher.set" => handle_teacher_set(state, req),
        "week.change" => handle_week_change(state, req),
        "week.setStartDate" => handle_week_set_start_date(state, req),
        "tab.set" => handle_tab_set(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
