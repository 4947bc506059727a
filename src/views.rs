use crate::matching::{same_teacher, same_teacher_trimmed, teacher_contains};
use crate::model::{ScheduleRow, TeacherOwned, TimetableEntry};
use std::collections::BTreeSet;

/// Rows of one teacher's partition (case-insensitive exact name match).
pub fn teacher_rows<T: TeacherOwned + Clone>(rows: &[T], teacher_name: &str) -> Vec<T> {
    rows.iter()
        .filter(|r| same_teacher(r.teacher_name(), teacher_name))
        .cloned()
        .collect()
}

/// Swaps one teacher's partition for `replacement`, re-tagging every new row
/// with the teacher name. Other teachers' rows keep their order and come first.
pub fn replace_teacher_rows<T: TeacherOwned + Clone>(
    rows: &[T],
    teacher_name: &str,
    replacement: Vec<T>,
) -> Vec<T> {
    let mut out: Vec<T> = rows
        .iter()
        .filter(|r| !same_teacher(r.teacher_name(), teacher_name))
        .cloned()
        .collect();
    out.extend(replacement.into_iter().map(|mut r| {
        r.set_teacher_name(teacher_name);
        r
    }));
    out
}

/// Subjects relevant to the active teacher, falling back to the global list
/// for an unknown or unset teacher.
pub fn teacher_subjects(
    teacher_name: &str,
    timetable: &[TimetableEntry],
    schedule: &[ScheduleRow],
    subjects: &[String],
) -> Vec<String> {
    if teacher_name.is_empty() {
        return subjects.to_vec();
    }

    let mut found: BTreeSet<String> = BTreeSet::new();
    let from_timetable = timetable
        .iter()
        .filter(|t| same_teacher_trimmed(&t.teacher_name, teacher_name))
        .map(|t| t.subject.trim());
    let from_schedule = schedule
        .iter()
        .filter(|s| same_teacher_trimmed(&s.teacher_name, teacher_name))
        .map(|s| s.subject.trim());
    for subject in from_timetable.chain(from_schedule) {
        if !subject.is_empty() {
            found.insert(subject.to_string());
        }
    }

    if found.is_empty() {
        subjects.to_vec()
    } else {
        found.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub subjects: Vec<String>,
    pub classes: Vec<String>,
}

fn merge_sorted(prev: &[String], extra: BTreeSet<String>) -> Vec<String> {
    let mut all: BTreeSet<String> = prev.iter().cloned().collect();
    all.extend(extra);
    all.into_iter().collect()
}

/// Folds the subjects and classes the teacher teaches into the global lists.
///
/// Returns `None` when nothing in the timetable belongs to the teacher, in
/// which case the stored lists stay as they are.
pub fn merge_vocabulary(
    timetable: &[TimetableEntry],
    teacher_name: &str,
    subjects: &[String],
    classes: &[String],
) -> Option<Vocabulary> {
    if timetable.is_empty() || teacher_name.is_empty() {
        return None;
    }

    let mut mine: Vec<&TimetableEntry> = timetable
        .iter()
        .filter(|t| same_teacher_trimmed(&t.teacher_name, teacher_name))
        .collect();
    if mine.is_empty() {
        tracing::debug!(teacher = teacher_name, "no exact timetable match, trying loose match");
        mine = timetable
            .iter()
            .filter(|t| teacher_contains(&t.teacher_name, teacher_name))
            .collect();
    }
    if mine.is_empty() {
        return None;
    }

    let mut new_subjects = BTreeSet::new();
    let mut new_classes = BTreeSet::new();
    for entry in mine {
        let subject = entry.subject.trim();
        if !subject.is_empty() {
            new_subjects.insert(subject.to_string());
        }
        let class_name = entry.class_name.trim();
        if !class_name.is_empty() {
            new_classes.insert(class_name.to_string());
        }
    }

    Some(Vocabulary {
        subjects: merge_sorted(subjects, new_subjects),
        classes: merge_sorted(classes, new_classes),
    })
}
