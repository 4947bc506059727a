//! Workflows that move state between the timetable, the teaching log and the
//! equipment sheet. Each one runs in a single transaction and saves every slot
//! it changes before returning.

use crate::equipment;
use crate::matching::same_teacher;
use crate::model::{AppTab, EquipmentRow, ScheduleRow, TimetableEntry};
use crate::schedule::{self, ScheduleContext};
use crate::store;
use crate::views::{self, Vocabulary};
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct AppliedTimetable {
    pub teacher_name: String,
    pub week: i64,
    pub rows: Vec<ScheduleRow>,
}

#[derive(Debug, Clone)]
pub struct ImportedTimetable {
    pub entry_count: usize,
    pub subjects: Vec<String>,
    pub classes: Vec<String>,
    pub generated_rows: usize,
}

#[derive(Debug, Clone)]
pub struct WeekChange {
    pub current_week: i64,
    pub week_start_date: String,
    pub generated_rows: usize,
}

#[derive(Debug, Clone)]
pub struct ScheduleUpdate {
    pub rows: Vec<ScheduleRow>,
    pub equipment: Vec<EquipmentRow>,
}

fn has_week(schedule: &[ScheduleRow], teacher_name: &str, week: i64) -> bool {
    schedule
        .iter()
        .any(|r| r.week == week && same_teacher(&r.teacher_name, teacher_name))
}

/// Folds the active teacher's timetable subjects and classes into the global
/// vocabularies and saves them.
fn merge_vocabulary(conn: &Connection) -> store::Result<Option<Vocabulary>> {
    let teacher = store::load_teacher_name(conn)?;
    let timetable = store::load_timetable(conn)?;
    let subjects = store::load_subjects(conn)?;
    let classes = store::load_classes(conn)?;
    let merged = views::merge_vocabulary(&timetable, &teacher, &subjects, &classes);
    if let Some(v) = &merged {
        store::save_subjects(conn, &v.subjects)?;
        store::save_classes(conn, &v.classes)?;
    }
    Ok(merged)
}

/// Generates the current week for the active teacher when it has no rows yet.
/// Returns the number of rows inserted.
fn populate_week(conn: &Connection) -> store::Result<usize> {
    let teacher = store::load_teacher_name(conn)?;
    if teacher.is_empty() {
        return Ok(0);
    }
    let week = store::load_current_week(conn)?;
    let history = store::load_schedule(conn)?;
    if has_week(&history, &teacher, week) {
        return Ok(0);
    }
    let timetable = store::load_timetable(conn)?;
    if timetable.is_empty() {
        return Ok(0);
    }

    let entries = schedule::pick_entries(&[], &timetable, &teacher);
    let ppct = store::load_ppct(conn)?;
    let start = store::load_week_start_date(conn)?;
    let ctx = ScheduleContext {
        teacher_name: &teacher,
        history: &history,
        ppct: &ppct,
    };
    let rows = schedule::generate(&ctx, week, &start, &entries);
    if rows.is_empty() {
        return Ok(0);
    }

    // Re-read right before inserting so an overlapping trigger cannot
    // populate the same week twice.
    let mut latest = store::load_schedule(conn)?;
    if has_week(&latest, &teacher, week) {
        tracing::debug!(teacher = %teacher, week, "week already populated, skipping");
        return Ok(0);
    }
    latest.extend(rows.iter().cloned());
    store::save_schedule(conn, &latest)?;

    let equipment = store::load_equipment(conn)?;
    let config = store::load_equipment_config(conn)?;
    let seeded = equipment::seed_week(&teacher, week, &rows, &equipment, &config);
    store::save_equipment(conn, &seeded)?;

    tracing::info!(teacher = %teacher, week, rows = rows.len(), "populated week from timetable");
    Ok(rows.len())
}

/// Auto-populates the current week if it is still empty.
pub fn ensure_week_populated(conn: &Connection) -> store::Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let n = populate_week(&tx)?;
    tx.commit()?;
    Ok(n)
}

/// Replaces the stored timetable with an imported one. A missing file name
/// clears the previous one.
pub fn import_timetable(
    conn: &Connection,
    entries: &[TimetableEntry],
    file_name: Option<&str>,
) -> store::Result<ImportedTimetable> {
    let tx = conn.unchecked_transaction()?;
    store::save_timetable(&tx, entries)?;
    store::save_timetable_file(&tx, file_name.unwrap_or_default())?;
    merge_vocabulary(&tx)?;
    let generated_rows = populate_week(&tx)?;
    let subjects = store::load_subjects(&tx)?;
    let classes = store::load_classes(&tx)?;
    tx.commit()?;

    tracing::info!(entries = entries.len(), generated_rows, "imported timetable");
    Ok(ImportedTimetable {
        entry_count: entries.len(),
        subjects,
        classes,
        generated_rows,
    })
}

pub fn set_teacher_name(conn: &Connection, name: &str) -> store::Result<usize> {
    let tx = conn.unchecked_transaction()?;
    store::save_teacher_name(&tx, name)?;
    merge_vocabulary(&tx)?;
    let n = populate_week(&tx)?;
    tx.commit()?;
    Ok(n)
}

/// Moves to `new_week`, shifting the week-start date by whole weeks. A stored
/// date that does not parse, or a shift past the calendar range, keeps the
/// date as is.
pub fn change_week(conn: &Connection, new_week: i64) -> store::Result<WeekChange> {
    let tx = conn.unchecked_transaction()?;
    let old_week = store::load_current_week(&tx)?;
    store::save_current_week(&tx, new_week)?;

    let start = store::load_week_start_date(&tx)?;
    let shifted = new_week
        .checked_sub(old_week)
        .and_then(|diff| schedule::shift_week_start(&start, diff));
    let week_start_date = match shifted {
        Some(shifted) => {
            store::save_week_start_date(&tx, &shifted)?;
            shifted
        }
        None => {
            if new_week != old_week {
                tracing::warn!(date = %start, old_week, new_week, "week start date cannot be shifted, leaving it unchanged");
            }
            start
        }
    };

    let generated_rows = populate_week(&tx)?;
    tx.commit()?;
    Ok(WeekChange {
        current_week: new_week,
        week_start_date,
        generated_rows,
    })
}

/// Writes the timetable into the current week's teaching log.
///
/// The first entry's teacher becomes the active teacher. The teacher's rows for
/// the current week are replaced by the generated ones and their equipment is
/// re-synchronized.
pub fn apply_timetable(
    conn: &Connection,
    entries: &[TimetableEntry],
) -> store::Result<AppliedTimetable> {
    let tx = conn.unchecked_transaction()?;

    let mut teacher = store::load_teacher_name(&tx)?;
    if let Some(first) = entries.first() {
        if !first.teacher_name.is_empty() && first.teacher_name != teacher {
            teacher = first.teacher_name.clone();
            store::save_teacher_name(&tx, &teacher)?;
            merge_vocabulary(&tx)?;
        }
    }

    let week = store::load_current_week(&tx)?;
    let start = store::load_week_start_date(&tx)?;
    let timetable = store::load_timetable(&tx)?;
    let history = store::load_schedule(&tx)?;
    let ppct = store::load_ppct(&tx)?;

    let picked = schedule::pick_entries(entries, &timetable, &teacher);
    let ctx = ScheduleContext {
        teacher_name: &teacher,
        history: &history,
        ppct: &ppct,
    };
    let rows = schedule::generate(&ctx, week, &start, &picked);

    let mut next: Vec<ScheduleRow> = history
        .iter()
        .filter(|r| !(r.week == week && same_teacher(&r.teacher_name, &teacher)))
        .cloned()
        .collect();
    next.extend(rows.iter().cloned());
    store::save_schedule(&tx, &next)?;

    let equipment_rows = store::load_equipment(&tx)?;
    let config = store::load_equipment_config(&tx)?;
    let synced = equipment::sync(&teacher, &rows, &equipment_rows, &config);
    store::save_equipment(&tx, &synced)?;

    store::save_active_tab(&tx, AppTab::Schedule)?;
    tx.commit()?;

    tracing::info!(teacher = %teacher, week, rows = rows.len(), "applied timetable to week");
    Ok(AppliedTimetable {
        teacher_name: teacher,
        week,
        rows,
    })
}

/// Saves an edited teaching log for the active teacher and re-derives the
/// equipment rows of the current week from it.
pub fn update_schedule(conn: &Connection, rows: Vec<ScheduleRow>) -> store::Result<ScheduleUpdate> {
    let tx = conn.unchecked_transaction()?;
    let teacher = store::load_teacher_name(&tx)?;
    let week = store::load_current_week(&tx)?;

    let schedule_rows = store::load_schedule(&tx)?;
    let next = views::replace_teacher_rows(&schedule_rows, &teacher, rows);
    store::save_schedule(&tx, &next)?;

    let mine = views::teacher_rows(&next, &teacher);
    let week_rows: Vec<ScheduleRow> = mine.iter().filter(|r| r.week == week).cloned().collect();
    let equipment_rows = store::load_equipment(&tx)?;
    let config = store::load_equipment_config(&tx)?;
    let synced = equipment::sync(&teacher, &week_rows, &equipment_rows, &config);
    store::save_equipment(&tx, &synced)?;
    tx.commit()?;

    tracing::debug!(teacher = %teacher, week, synced_rows = week_rows.len(), "schedule saved");
    Ok(ScheduleUpdate {
        rows: mine,
        equipment: views::teacher_rows(&synced, &teacher),
    })
}

/// Replaces the active teacher's equipment sheet.
pub fn update_equipment(conn: &Connection, rows: Vec<EquipmentRow>) -> store::Result<Vec<EquipmentRow>> {
    let tx = conn.unchecked_transaction()?;
    let teacher = store::load_teacher_name(&tx)?;
    let equipment_rows = store::load_equipment(&tx)?;
    let next = views::replace_teacher_rows(&equipment_rows, &teacher, rows);
    store::save_equipment(&tx, &next)?;
    tx.commit()?;
    Ok(views::teacher_rows(&next, &teacher))
}

/// Generates a week without saving anything. Missing arguments come from the
/// stored session.
pub fn preview_week(
    conn: &Connection,
    week: Option<i64>,
    week_start_date: Option<&str>,
    entries: &[TimetableEntry],
) -> store::Result<Vec<ScheduleRow>> {
    let teacher = store::load_teacher_name(conn)?;
    let week = match week {
        Some(w) => w,
        None => store::load_current_week(conn)?,
    };
    let start = match week_start_date {
        Some(d) => d.to_string(),
        None => store::load_week_start_date(conn)?,
    };
    let timetable = store::load_timetable(conn)?;
    let history = store::load_schedule(conn)?;
    let ppct = store::load_ppct(conn)?;
    let picked = schedule::pick_entries(entries, &timetable, &teacher);
    let ctx = ScheduleContext {
        teacher_name: &teacher,
        history: &history,
        ppct: &ppct,
    };
    Ok(schedule::generate(&ctx, week, &start, &picked))
}
