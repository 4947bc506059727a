use crate::matching::{normalize, same_lesson_number, same_teacher};
use crate::model::{EquipmentConfigEntry, EquipmentRow, ScheduleRow};
use uuid::Uuid;

pub fn find_config<'a>(
    config: &'a [EquipmentConfigEntry],
    subject: &str,
    ppct_number: &str,
) -> Option<&'a EquipmentConfigEntry> {
    let key = normalize(subject);
    config
        .iter()
        .find(|c| normalize(&c.subject) == key && same_lesson_number(&c.lesson_number, ppct_number))
}

fn fresh_row(row: &ScheduleRow, cfg: Option<&EquipmentConfigEntry>, teacher_name: &str) -> EquipmentRow {
    let (equipment_name, quantity) = match cfg {
        Some(c) if c.quantity.is_empty() => (c.equipment_name.clone(), "1".to_string()),
        Some(c) => (c.equipment_name.clone(), c.quantity.clone()),
        None => (String::new(), String::new()),
    };
    EquipmentRow {
        id: Uuid::new_v4().to_string(),
        week: row.week,
        day_of_week: row.day_of_week.clone(),
        date: row.date.clone(),
        period: row.period,
        subject: row.subject.clone(),
        class_name: row.class_name.clone(),
        ppct_number: row.ppct_number.clone(),
        equipment_name,
        quantity,
        teacher_name: teacher_name.to_string(),
    }
}

/// Re-derives one teacher's equipment partition from that teacher's schedule
/// rows for the current week.
///
/// A matching config entry overrides the equipment name; with no config match
/// the previously entered name and quantity are kept. Lesson fields are always
/// refreshed from the schedule row.
pub fn sync_teacher_equipment(
    teacher_name: &str,
    week_rows: &[ScheduleRow],
    mut mine: Vec<EquipmentRow>,
    config: &[EquipmentConfigEntry],
) -> Vec<EquipmentRow> {
    for row in week_rows {
        let cfg = find_config(config, &row.subject, &row.ppct_number);
        match mine.iter().position(|e| e.same_slot(row)) {
            Some(idx) => {
                let existing = &mut mine[idx];
                let name = match cfg {
                    Some(c) => c.equipment_name.clone(),
                    None => existing.equipment_name.clone(),
                };
                let quantity = match cfg {
                    Some(c) if !c.quantity.is_empty() => c.quantity.clone(),
                    _ if name.is_empty() => String::new(),
                    _ if existing.quantity.is_empty() => "1".to_string(),
                    _ => existing.quantity.clone(),
                };
                existing.subject = row.subject.clone();
                existing.class_name = row.class_name.clone();
                existing.ppct_number = row.ppct_number.clone();
                existing.date = row.date.clone();
                existing.equipment_name = name;
                existing.quantity = quantity;
                existing.teacher_name = teacher_name.to_string();
            }
            None => {
                if row.subject.is_empty() && row.class_name.is_empty() {
                    continue;
                }
                mine.push(fresh_row(row, cfg, teacher_name));
            }
        }
    }
    mine
}

/// Global form of [`sync_teacher_equipment`]: other teachers' rows pass
/// through untouched and stay ahead of the teacher's rows.
pub fn sync(
    teacher_name: &str,
    week_rows: &[ScheduleRow],
    equipment: &[EquipmentRow],
    config: &[EquipmentConfigEntry],
) -> Vec<EquipmentRow> {
    let (mine, others): (Vec<EquipmentRow>, Vec<EquipmentRow>) = equipment
        .iter()
        .cloned()
        .partition(|e| same_teacher(&e.teacher_name, teacher_name));
    let mut out = others;
    out.extend(sync_teacher_equipment(teacher_name, week_rows, mine, config));
    out
}

/// Equipment for a freshly populated week: the teacher's rows for `week` are
/// replaced by one row per new schedule row.
pub fn seed_week(
    teacher_name: &str,
    week: i64,
    new_rows: &[ScheduleRow],
    equipment: &[EquipmentRow],
    config: &[EquipmentConfigEntry],
) -> Vec<EquipmentRow> {
    let mut out: Vec<EquipmentRow> = equipment
        .iter()
        .filter(|e| !(same_teacher(&e.teacher_name, teacher_name) && e.week == week))
        .cloned()
        .collect();
    out.extend(new_rows.iter().map(|row| {
        let cfg = find_config(config, &row.subject, &row.ppct_number);
        fresh_row(row, cfg, teacher_name)
    }));
    out
}
