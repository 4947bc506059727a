//! Named-slot persistence for the lesson log.
//!
//! Every piece of state lives in one flat key space. Lists are stored as JSON
//! array text, scalars as raw text. An absent slot reads as its built-in
//! default; a slot that holds malformed JSON is an error.

use crate::db;
use crate::model::{
    AppTab, EquipmentConfigEntry, EquipmentRow, PpctEntry, ScheduleRow, TimetableEntry,
};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DEFAULT_WEEK: i64 = 13;

pub const DEFAULT_SUBJECTS: [&str; 16] = [
    "Toán(Đ)",
    "Toán(H)",
    "Ngữ Văn",
    "Tiếng Anh",
    "KHTN",
    "Lịch Sử & ĐL",
    "GDCD",
    "Tin Học 7",
    "Tin Học 9",
    "Tin học 7",
    "Tin học 9",
    "Công Nghệ",
    "HĐTN",
    "GDTC",
    "Âm Nhạc",
    "Mỹ Thuật",
];

pub const DEFAULT_CLASSES: [&str; 8] = ["9D1", "9D2", "9D3", "9D4", "7B1", "7B2", "7B3", "7B4"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    ActiveTab,
    Ppct,
    Schedule,
    Equipment,
    EquipmentConfig,
    Subjects,
    Classes,
    CurrentWeek,
    WeekStartDate,
    TeacherName,
    Timetable,
    TimetableFile,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Self::ActiveTab => "TS_ACTIVE_TAB",
            Self::Ppct => "TS_PPCT_DATA",
            Self::Schedule => "TS_SCHEDULE_DATA",
            Self::Equipment => "TS_EQUIPMENT_DATA",
            Self::EquipmentConfig => "TS_EQUIPMENT_CONFIG",
            Self::Subjects => "TS_SUBJECTS",
            Self::Classes => "TS_CLASSES",
            Self::CurrentWeek => "TS_CURRENT_WEEK",
            Self::WeekStartDate => "TS_WEEK_START_DATE",
            Self::TeacherName => "TS_TEACHER_NAME",
            Self::Timetable => "TS_TIMETABLE_DATA",
            Self::TimetableFile => "TS_TIMETABLE_FILE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("slot {key} holds malformed JSON: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode slot value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

fn get_raw(conn: &Connection, slot: Slot) -> Result<Option<String>> {
    Ok(db::slot_get(conn, slot.key())?)
}

fn set_raw(conn: &Connection, slot: Slot, value: &str) -> Result<()> {
    db::slot_set(conn, slot.key(), value)?;
    Ok(())
}

fn load_list_or<T, F>(conn: &Connection, slot: Slot, default: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Vec<T>,
{
    match get_raw(conn, slot)? {
        Some(text) => serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            key: slot.key(),
            source,
        }),
        None => Ok(default()),
    }
}

fn save_list<T: Serialize>(conn: &Connection, slot: Slot, rows: &[T]) -> Result<()> {
    let text = serde_json::to_string(rows)?;
    set_raw(conn, slot, &text)
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub fn load_timetable(conn: &Connection) -> Result<Vec<TimetableEntry>> {
    load_list_or(conn, Slot::Timetable, Vec::new)
}

pub fn save_timetable(conn: &Connection, rows: &[TimetableEntry]) -> Result<()> {
    save_list(conn, Slot::Timetable, rows)
}

pub fn load_schedule(conn: &Connection) -> Result<Vec<ScheduleRow>> {
    load_list_or(conn, Slot::Schedule, Vec::new)
}

pub fn save_schedule(conn: &Connection, rows: &[ScheduleRow]) -> Result<()> {
    save_list(conn, Slot::Schedule, rows)
}

pub fn load_equipment(conn: &Connection) -> Result<Vec<EquipmentRow>> {
    load_list_or(conn, Slot::Equipment, Vec::new)
}

pub fn save_equipment(conn: &Connection, rows: &[EquipmentRow]) -> Result<()> {
    save_list(conn, Slot::Equipment, rows)
}

pub fn load_ppct(conn: &Connection) -> Result<Vec<PpctEntry>> {
    load_list_or(conn, Slot::Ppct, Vec::new)
}

pub fn save_ppct(conn: &Connection, rows: &[PpctEntry]) -> Result<()> {
    save_list(conn, Slot::Ppct, rows)
}

pub fn load_equipment_config(conn: &Connection) -> Result<Vec<EquipmentConfigEntry>> {
    load_list_or(conn, Slot::EquipmentConfig, Vec::new)
}

pub fn save_equipment_config(conn: &Connection, rows: &[EquipmentConfigEntry]) -> Result<()> {
    save_list(conn, Slot::EquipmentConfig, rows)
}

pub fn load_subjects(conn: &Connection) -> Result<Vec<String>> {
    load_list_or(conn, Slot::Subjects, || owned(&DEFAULT_SUBJECTS))
}

pub fn save_subjects(conn: &Connection, values: &[String]) -> Result<()> {
    save_list(conn, Slot::Subjects, values)
}

pub fn load_classes(conn: &Connection) -> Result<Vec<String>> {
    load_list_or(conn, Slot::Classes, || owned(&DEFAULT_CLASSES))
}

pub fn save_classes(conn: &Connection, values: &[String]) -> Result<()> {
    save_list(conn, Slot::Classes, values)
}

pub fn load_teacher_name(conn: &Connection) -> Result<String> {
    Ok(get_raw(conn, Slot::TeacherName)?.unwrap_or_default())
}

pub fn save_teacher_name(conn: &Connection, name: &str) -> Result<()> {
    set_raw(conn, Slot::TeacherName, name)
}

pub fn load_timetable_file(conn: &Connection) -> Result<String> {
    Ok(get_raw(conn, Slot::TimetableFile)?.unwrap_or_default())
}

pub fn save_timetable_file(conn: &Connection, name: &str) -> Result<()> {
    set_raw(conn, Slot::TimetableFile, name)
}

pub fn load_current_week(conn: &Connection) -> Result<i64> {
    let Some(raw) = get_raw(conn, Slot::CurrentWeek)? else {
        return Ok(DEFAULT_WEEK);
    };
    match raw.trim().parse::<i64>() {
        Ok(week) => Ok(week),
        Err(_) => {
            tracing::warn!(value = %raw, "stored week is not a number, using default");
            Ok(DEFAULT_WEEK)
        }
    }
}

pub fn save_current_week(conn: &Connection, week: i64) -> Result<()> {
    set_raw(conn, Slot::CurrentWeek, &week.to_string())
}

pub fn today_iso() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn load_week_start_date(conn: &Connection) -> Result<String> {
    Ok(get_raw(conn, Slot::WeekStartDate)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(today_iso))
}

pub fn save_week_start_date(conn: &Connection, date: &str) -> Result<()> {
    set_raw(conn, Slot::WeekStartDate, date)
}

pub fn load_active_tab(conn: &Connection) -> Result<AppTab> {
    Ok(get_raw(conn, Slot::ActiveTab)?
        .and_then(|raw| AppTab::parse(&raw))
        .unwrap_or_default())
}

pub fn save_active_tab(conn: &Connection, tab: AppTab) -> Result<()> {
    set_raw(conn, Slot::ActiveTab, tab.as_str())
}

/// Scalar state shown in every panel header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub teacher_name: String,
    pub current_week: i64,
    pub week_start_date: String,
    pub active_tab: AppTab,
    pub timetable_file: String,
}

pub fn load_session(conn: &Connection) -> Result<Session> {
    Ok(Session {
        teacher_name: load_teacher_name(conn)?,
        current_week: load_current_week(conn)?,
        week_start_date: load_week_start_date(conn)?,
        active_tab: load_active_tab(conn)?,
        timetable_file: load_timetable_file(conn)?,
    })
}

/// Validates every list slot by decoding it; the first corrupt slot wins.
pub fn check_all(conn: &Connection) -> Result<()> {
    load_timetable(conn)?;
    load_schedule(conn)?;
    load_equipment(conn)?;
    load_ppct(conn)?;
    load_equipment_config(conn)?;
    load_subjects(conn)?;
    load_classes(conn)?;
    Ok(())
}
