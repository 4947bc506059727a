mod test_support;

use serde_json::json;
use test_support::{rows, slot, spawn_sidecar, temp_dir};

#[test]
fn changing_week_shifts_date_and_fills_the_new_week_once() {
    let workspace = temp_dir("lessonlog-week-change");
    let mut sc = spawn_sidecar();
    sc.open(&workspace);

    sc.request_ok("week.setStartDate", json!({ "weekStartDate": "2024-11-25" }));
    sc.request_ok("teacher.set", json!({ "teacherName": "Nguyen" }));
    let imported = sc.request_ok(
        "timetable.import",
        json!({ "entries": [slot("Nguyen", "Toán(Đ)", "9D1", "Thứ 2", 1)], "fileName": "tkb-hk1.xlsx" }),
    );
    assert_eq!(imported["generatedRows"], json!(1));

    let next = sc.request_ok("week.change", json!({ "week": 14 }));
    assert_eq!(next["currentWeek"], json!(14));
    assert_eq!(next["weekStartDate"], json!("2024-12-02"));
    assert_eq!(next["generatedRows"], json!(1));

    let week14 = rows(&sc.request_ok("schedule.list", json!({ "week": 14 })));
    assert_eq!(week14.len(), 1);
    assert_eq!(week14[0]["ppctNumber"], json!("2"));
    assert_eq!(week14[0]["date"], json!("2024-12-02"));
    assert_eq!(rows(&sc.request_ok("equipment.list", json!({ "week": 14 }))).len(), 1);

    let same = sc.request_ok("week.change", json!({ "week": 14 }));
    assert_eq!(same["generatedRows"], json!(0));
    assert_eq!(same["weekStartDate"], json!("2024-12-02"));

    let back = sc.request_ok("week.change", json!({ "week": 13 }));
    assert_eq!(back["weekStartDate"], json!("2024-11-25"));
    assert_eq!(back["generatedRows"], json!(0));
    assert_eq!(rows(&sc.request_ok("schedule.list", json!({}))).len(), 2);

    let session = sc.request_ok("session.get", json!({}));
    assert_eq!(session["currentWeek"], json!(13));
    assert_eq!(session["timetableFile"], json!("tkb-hk1.xlsx"));

    sc.shutdown();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn unparseable_start_date_is_left_alone() {
    let workspace = temp_dir("lessonlog-week-baddate");
    let mut sc = spawn_sidecar();
    sc.open(&workspace);

    sc.request_ok("week.setStartDate", json!({ "weekStartDate": "someday" }));
    sc.request_ok("teacher.set", json!({ "teacherName": "Nguyen" }));
    sc.request_ok(
        "timetable.import",
        json!({ "entries": [slot("Nguyen", "GDCD", "9D3", "Thứ 6", 4)] }),
    );

    let changed = sc.request_ok("week.change", json!({ "week": 15 }));
    assert_eq!(changed["weekStartDate"], json!("someday"));
    assert_eq!(changed["generatedRows"], json!(1));
    let week15 = rows(&sc.request_ok("schedule.list", json!({ "week": 15 })));
    assert_eq!(week15[0]["date"], json!(""));
    assert_eq!(week15[0]["dayOfWeek"], json!("Thứ 6"));

    sc.shutdown();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn no_population_without_a_teacher() {
    let workspace = temp_dir("lessonlog-week-noteacher");
    let mut sc = spawn_sidecar();
    sc.open(&workspace);

    sc.request_ok(
        "timetable.import",
        json!({ "entries": [slot("Nguyen", "GDCD", "9D3", "Thứ 6", 4)] }),
    );
    let changed = sc.request_ok("week.change", json!({ "week": 14 }));
    assert_eq!(changed["generatedRows"], json!(0));

    sc.shutdown();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn extreme_week_numbers_keep_the_start_date() {
    let workspace = temp_dir("lessonlog-week-extreme");
    let mut sc = spawn_sidecar();
    sc.open(&workspace);
    sc.request_ok("week.setStartDate", json!({ "weekStartDate": "2024-11-25" }));

    let far = sc.request_ok("week.change", json!({ "week": 20_000_000_000i64 }));
    assert_eq!(far["currentWeek"], json!(20_000_000_000i64));
    assert_eq!(far["weekStartDate"], json!("2024-11-25"));

    let max = sc.request_ok("week.change", json!({ "week": i64::MAX }));
    assert_eq!(max["weekStartDate"], json!("2024-11-25"));
    let min = sc.request_ok("week.change", json!({ "week": i64::MIN }));
    assert_eq!(min["weekStartDate"], json!("2024-11-25"));

    sc.request_ok("health", json!({}));
    let back = sc.request_ok("week.change", json!({ "week": 13 }));
    assert_eq!(back["weekStartDate"], json!("2024-11-25"));
    let next = sc.request_ok("week.change", json!({ "week": 14 }));
    assert_eq!(next["weekStartDate"], json!("2024-12-02"));

    sc.shutdown();
    let _ = std::fs::remove_dir_all(workspace);
}
