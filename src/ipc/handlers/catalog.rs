use crate::ipc::helpers::{db_conn, required_list, respond, HandlerResult};
use crate::ipc::types::{AppState, Request};
use crate::model::{EquipmentConfigEntry, PpctEntry};
use crate::{store, views};
use serde_json::json;

fn clean_values(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim().to_string();
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

fn handle_ppct_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    Ok(json!({ "entries": store::load_ppct(conn)? }))
}

fn handle_ppct_replace(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let entries: Vec<PpctEntry> = required_list(req, "entries")?;
    store::save_ppct(conn, &entries)?;
    Ok(json!({ "entries": entries }))
}

fn handle_equipment_config_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    Ok(json!({ "entries": store::load_equipment_config(conn)? }))
}

fn handle_equipment_config_replace(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let entries: Vec<EquipmentConfigEntry> = required_list(req, "entries")?;
    store::save_equipment_config(conn, &entries)?;
    Ok(json!({ "entries": entries }))
}

fn handle_vocabulary_get(state: &mut AppState, _req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let teacher = store::load_teacher_name(conn)?;
    let subjects = store::load_subjects(conn)?;
    let classes = store::load_classes(conn)?;
    let timetable = store::load_timetable(conn)?;
    let schedule = store::load_schedule(conn)?;
    let teacher_subjects = views::teacher_subjects(&teacher, &timetable, &schedule, &subjects);
    Ok(json!({
        "subjects": subjects,
        "teacherSubjects": teacher_subjects,
        "classes": classes,
    }))
}

fn handle_subjects_replace(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let values = clean_values(required_list(req, "values")?);
    store::save_subjects(conn, &values)?;
    Ok(json!({ "values": values }))
}

fn handle_classes_replace(state: &mut AppState, req: &Request) -> HandlerResult {
    let conn = db_conn(state)?;
    let values = clean_values(required_list(req, "values")?);
    store::save_classes(conn, &values)?;
    Ok(json!({ "values": values }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "ppct.list" => handle_ppct_list(state, req),
        "ppct.replace" => handle_ppct_replace(state, req),
        "equipmentConfig.list" => handle_equipment_config_list(state, req),
        "equipmentConfig.replace" => handle_equipment_config_replace(state, req),
        "vocabulary.get" => handle_vocabulary_get(state, req),
        "subjects.replace" => handle_subjects_replace(state, req),
        "classes.replace" => handle_classes_replace(state, req),
        _ => return None,
    };
    Some(respond(req, result))
}
