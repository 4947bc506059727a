use crate::matching::{
    lesson_key, leading_number, normalize, same_lesson_number, same_teacher, teacher_contains,
    weekday_index, DAYS_OF_WEEK,
};
use crate::model::{PpctEntry, ScheduleRow, TimetableEntry};
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::HashMap;
use uuid::Uuid;

/// Everything the generator reads besides the week being produced.
pub struct ScheduleContext<'a> {
    pub teacher_name: &'a str,
    pub history: &'a [ScheduleRow],
    pub ppct: &'a [PpctEntry],
}

/// Lesson title for `(subject, ppct_number)`, or empty when the curriculum
/// table has no such lesson.
pub fn lesson_name(ppct: &[PpctEntry], subject: &str, ppct_number: &str) -> String {
    if subject.is_empty() || ppct_number.is_empty() {
        return String::new();
    }
    let key = normalize(subject);
    ppct.iter()
        .find(|p| normalize(&p.subject) == key && same_lesson_number(&p.lesson_number, ppct_number))
        .map(|p| p.lesson_name.clone())
        .unwrap_or_default()
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let y: i32 = parts[0].trim().parse().ok()?;
    let m: u32 = parts[1].trim().parse().ok()?;
    let d: u32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// `base + days` as `YYYY-MM-DD`; empty when `base` is not a valid date.
pub fn day_date(base: &str, days: i64) -> String {
    parse_iso_date(base)
        .and_then(|d| d.checked_add_signed(ChronoDuration::try_days(days)?))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Week-start date moved by whole weeks. `None` leaves the stored date alone,
/// including when the shift falls outside the calendar range.
pub fn shift_week_start(base: &str, week_diff: i64) -> Option<String> {
    if week_diff == 0 {
        return None;
    }
    let shifted = day_date(base, week_diff.checked_mul(7)?);
    if shifted.is_empty() {
        None
    } else {
        Some(shifted)
    }
}

/// Explicit entries win; otherwise every timetable slot whose teacher name
/// loosely contains the active teacher.
pub fn pick_entries(
    explicit: &[TimetableEntry],
    timetable: &[TimetableEntry],
    teacher_name: &str,
) -> Vec<TimetableEntry> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    if teacher_name.is_empty() || timetable.is_empty() {
        return Vec::new();
    }
    timetable
        .iter()
        .filter(|e| teacher_contains(&e.teacher_name, teacher_name))
        .cloned()
        .collect()
}

fn seed_counters(ctx: &ScheduleContext<'_>, week: i64) -> HashMap<String, i64> {
    let mut counters: HashMap<String, i64> = HashMap::new();
    for row in ctx.history {
        if !same_teacher(&row.teacher_name, ctx.teacher_name) || row.week >= week {
            continue;
        }
        if row.subject.is_empty() || row.ppct_number.is_empty() {
            continue;
        }
        if let Some(n) = leading_number(&row.ppct_number) {
            let slot = counters
                .entry(lesson_key(&row.subject, &row.class_name))
                .or_insert(0);
            *slot = (*slot).max(n);
        }
    }
    counters
}

/// Produces the dated, numbered lesson rows of `week` for the given slots.
///
/// Lesson numbers continue from the highest number the teacher reached for the
/// same subject and class in earlier weeks. Slots whose weekday cannot be
/// resolved are dropped.
pub fn generate(
    ctx: &ScheduleContext<'_>,
    week: i64,
    week_start_date: &str,
    entries: &[TimetableEntry],
) -> Vec<ScheduleRow> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut counters = seed_counters(ctx, week);

    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| (weekday_index(&e.day_of_week), e.period));

    let mut rows = Vec::with_capacity(sorted.len());
    for entry in &sorted {
        let Some(day_index) = weekday_index(&entry.day_of_week) else {
            tracing::debug!(day = %entry.day_of_week, "skipping slot with unknown weekday");
            continue;
        };

        let counter = counters
            .entry(lesson_key(&entry.subject, &entry.class_name))
            .or_insert(0);
        let Some(next) = counter.checked_add(1) else {
            tracing::warn!(subject = %entry.subject, class = %entry.class_name, "lesson number cannot advance, skipping slot");
            continue;
        };
        *counter = next;
        let ppct_number = next.to_string();

        rows.push(ScheduleRow {
            id: Uuid::new_v4().to_string(),
            week,
            day_of_week: DAYS_OF_WEEK[day_index].to_string(),
            date: day_date(week_start_date, day_index as i64),
            period: entry.period,
            subject: entry.subject.clone(),
            class_name: entry.class_name.clone(),
            lesson_name: lesson_name(ctx.ppct, &entry.subject, &ppct_number),
            ppct_number,
            notes: String::new(),
            teacher_name: ctx.teacher_name.to_string(),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(teacher: &str, subject: &str, class_name: &str, day: &str, period: i64) -> TimetableEntry {
        TimetableEntry {
            teacher_name: teacher.into(),
            subject: subject.into(),
            class_name: class_name.into(),
            day_of_week: day.into(),
            period,
        }
    }

    fn history_row(teacher: &str, week: i64, subject: &str, class_name: &str, ppct: &str) -> ScheduleRow {
        ScheduleRow {
            id: Uuid::new_v4().to_string(),
            week,
            day_of_week: "Thứ 2".into(),
            subject: subject.into(),
            class_name: class_name.into(),
            ppct_number: ppct.into(),
            teacher_name: teacher.into(),
            ..Default::default()
        }
    }

    #[test]
    fn first_week_starts_at_lesson_one() {
        let ppct = vec![PpctEntry {
            subject: "toán (đ)".into(),
            lesson_number: " 1 ".into(),
            lesson_name: "Phương trình bậc hai".into(),
        }];
        let ctx = ScheduleContext {
            teacher_name: "Nguyen",
            history: &[],
            ppct: &ppct,
        };
        let rows = generate(
            &ctx,
            13,
            "2024-11-25",
            &[slot("Nguyen", "Toán(Đ)", "9D1", "Thứ 2", 1)],
        );
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.week, 13);
        assert_eq!(r.day_of_week, "Thứ 2");
        assert_eq!(r.date, "2024-11-25");
        assert_eq!(r.period, 1);
        assert_eq!(r.ppct_number, "1");
        assert_eq!(r.lesson_name, "Phương trình bậc hai");
        assert_eq!(r.notes, "");
        assert_eq!(r.teacher_name, "Nguyen");
    }

    #[test]
    fn counters_continue_from_earlier_weeks_only() {
        let history = vec![
            history_row("Nguyen", 10, "KHTN", "7B1", "5"),
            history_row("Nguyen", 9, "khtn", "7b1", "3"),
            // same week or later must not count
            history_row("Nguyen", 13, "KHTN", "7B1", "40"),
            // other teacher
            history_row("Tran", 11, "KHTN", "7B1", "20"),
        ];
        let ctx = ScheduleContext {
            teacher_name: "nguyen",
            history: &history,
            ppct: &[],
        };
        let rows = generate(
            &ctx,
            13,
            "2024-11-25",
            &[slot("Nguyen", "KHTN", "7B1", "Thứ 4", 2)],
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ppct_number, "6");
        assert_eq!(rows[0].date, "2024-11-27");
        assert_eq!(rows[0].lesson_name, "");
    }

    #[test]
    fn exhausted_lesson_counter_skips_only_that_lesson() {
        let history = vec![history_row("Nguyen", 10, "KHTN", "7B1", "9223372036854775807")];
        let ctx = ScheduleContext {
            teacher_name: "Nguyen",
            history: &history,
            ppct: &[],
        };
        let rows = generate(
            &ctx,
            13,
            "2024-11-25",
            &[
                slot("Nguyen", "KHTN", "7B1", "Thứ 3", 2),
                slot("Nguyen", "GDCD", "9D3", "Thứ 6", 4),
            ],
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "GDCD");
        assert_eq!(rows[0].ppct_number, "1");
    }

    #[test]
    fn out_of_range_shifts_leave_the_date_alone() {
        assert_eq!(day_date("2024-11-25", i64::MAX), "");
        assert_eq!(day_date("2024-11-25", 7 * 20_000_000_000), "");
        assert_eq!(shift_week_start("2024-11-25", i64::MAX / 2), None);
        assert_eq!(shift_week_start("2024-11-25", 20_000_000_000), None);
        assert_eq!(shift_week_start("2024-11-25", -1), Some("2024-11-18".to_string()));
    }

    #[test]
    fn shared_subject_and_class_get_sequential_numbers_in_day_order() {
        let ctx = ScheduleContext {
            teacher_name: "Nguyen",
            history: &[],
            ppct: &[],
        };
        let rows = generate(
            &ctx,
            1,
            "2024-09-02",
            &[
                slot("Nguyen", "KHTN", "7B1", "Thứ 5", 3),
                slot("Nguyen", "KHTN", "7B1", "Thứ 2", 4),
                slot("Nguyen", "KHTN", "7B1", "Thứ 2", 2),
                slot("Nguyen", "KHTN", "7B2", "Thứ 3", 1),
            ],
        );
        let seq: Vec<(&str, i64, &str)> = rows
            .iter()
            .map(|r| (r.day_of_week.as_str(), r.period, r.ppct_number.as_str()))
            .collect();
        assert_eq!(
            seq,
            vec![
                ("Thứ 2", 2, "1"),
                ("Thứ 2", 4, "2"),
                ("Thứ 3", 1, "1"),
                ("Thứ 5", 3, "3"),
            ]
        );
    }

    #[test]
    fn unknown_weekdays_are_dropped_and_bad_dates_go_blank() {
        let ctx = ScheduleContext {
            teacher_name: "Nguyen",
            history: &[],
            ppct: &[],
        };
        let rows = generate(
            &ctx,
            2,
            "not-a-date",
            &[
                slot("Nguyen", "GDCD", "9D2", "Monday", 1),
                slot("Nguyen", "GDCD", "9D2", "Chủ nhật", 1),
            ],
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].day_of_week, "Chủ nhật");
        assert_eq!(rows[0].date, "");
        assert_eq!(rows[0].ppct_number, "1");
    }

    #[test]
    fn generation_is_repeatable() {
        let history = vec![history_row("Nguyen", 3, "Ngữ Văn", "9D3", "8")];
        let ctx = ScheduleContext {
            teacher_name: "Nguyen",
            history: &history,
            ppct: &[],
        };
        let entries = vec![
            slot("Nguyen", "Ngữ Văn", "9D3", "Thứ 3", 1),
            slot("Nguyen", "Ngữ Văn", "9D3", "Thứ 6", 2),
        ];
        let strip = |rows: Vec<ScheduleRow>| -> Vec<(String, String)> {
            rows.into_iter().map(|r| (r.date, r.ppct_number)).collect()
        };
        let a = strip(generate(&ctx, 4, "2024-09-23", &entries));
        let b = strip(generate(&ctx, 4, "2024-09-23", &entries));
        assert_eq!(a, b);
        assert_eq!(
            a,
            vec![
                ("2024-09-24".to_string(), "9".to_string()),
                ("2024-09-27".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn pick_entries_falls_back_to_loose_teacher_match() {
        let timetable = vec![
            slot("Cô Nguyen Thi A", "KHTN", "7B1", "Thứ 2", 1),
            slot("Tran", "KHTN", "7B2", "Thứ 2", 2),
        ];
        let picked = pick_entries(&[], &timetable, "nguyen");
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].class_name, "7B1");
        assert!(pick_entries(&[], &timetable, "").is_empty());
        assert!(pick_entries(&[], &[], "nguyen").is_empty());

        let explicit = vec![slot("Le", "GDTC", "8A1", "Thứ 7", 5)];
        assert_eq!(pick_entries(&explicit, &timetable, "nguyen"), explicit);
    }

    #[test]
    fn week_start_shifts_by_whole_weeks() {
        assert_eq!(
            shift_week_start("2024-11-25", 1),
            Some("2024-12-02".to_string())
        );
        assert_eq!(
            shift_week_start("2024-11-25", -2),
            Some("2024-11-11".to_string())
        );
        assert_eq!(shift_week_start("2024-11-25", 0), None);
        assert_eq!(shift_week_start("garbage", 1), None);
        assert_eq!(day_date("2024-02-30", 0), "");
        assert_eq!(day_date("2024-12-30", 6), "2025-01-05");
    }
}
