/// Canonical weekday ordering; index 0 is the first day of a teaching week.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Thứ 2", "Thứ 3", "Thứ 4", "Thứ 5", "Thứ 6", "Thứ 7", "Chủ nhật",
];

/// Comparison key for subject, class and teacher names: lowercase with all
/// whitespace removed.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn same_teacher(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn same_teacher_trimmed(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Loose teacher match used when exact matching finds nothing.
pub fn teacher_contains(candidate: &str, active: &str) -> bool {
    candidate.to_lowercase().contains(&active.to_lowercase())
}

pub fn same_lesson_number(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

/// Counter key for the per-(subject, class) lesson sequence.
pub fn lesson_key(subject: &str, class_name: &str) -> String {
    format!("{}_{}", normalize(subject), normalize(class_name))
}

/// First run of ASCII digits in `s`, if any.
pub fn leading_number(s: &str) -> Option<i64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn weekday_index(day: &str) -> Option<usize> {
    let key = normalize(day);
    let lower = day.to_lowercase();
    DAYS_OF_WEEK
        .iter()
        .position(|d| normalize(d) == key || lower.contains(&d.to_lowercase()))
}
