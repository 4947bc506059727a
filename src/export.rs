use crate::model::{EquipmentRow, ScheduleRow};
use anyhow::Context;
use std::path::Path;

const SCHEDULE_HEADER: [&str; 9] = [
    "Tuần",
    "Thứ",
    "Ngày",
    "Tiết",
    "Môn",
    "Lớp",
    "Tiết PPCT",
    "Tên bài dạy",
    "Ghi chú",
];

const EQUIPMENT_HEADER: [&str; 9] = [
    "Tuần",
    "Thứ",
    "Ngày",
    "Tiết",
    "Môn",
    "Lớp",
    "Tiết PPCT",
    "Tên thiết bị",
    "Số lượng",
];

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn push_record(out: &mut String, fields: &[&str]) {
    let line: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

pub fn schedule_csv(rows: &[ScheduleRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, &SCHEDULE_HEADER);
    for r in rows {
        let week = r.week.to_string();
        let period = r.period.to_string();
        push_record(
            &mut out,
            &[
                week.as_str(),
                r.day_of_week.as_str(),
                r.date.as_str(),
                period.as_str(),
                r.subject.as_str(),
                r.class_name.as_str(),
                r.ppct_number.as_str(),
                r.lesson_name.as_str(),
                r.notes.as_str(),
            ],
        );
    }
    out
}

pub fn equipment_csv(rows: &[EquipmentRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, &EQUIPMENT_HEADER);
    for r in rows {
        let week = r.week.to_string();
        let period = r.period.to_string();
        push_record(
            &mut out,
            &[
                week.as_str(),
                r.day_of_week.as_str(),
                r.date.as_str(),
                period.as_str(),
                r.subject.as_str(),
                r.class_name.as_str(),
                r.ppct_number.as_str(),
                r.equipment_name.as_str(),
                r.quantity.as_str(),
            ],
        );
    }
    out
}

pub fn write_sheet(out_path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    std::fs::write(out_path, contents)
        .with_context(|| format!("failed to write {}", out_path.to_string_lossy()))
}
