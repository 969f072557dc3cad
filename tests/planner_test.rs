use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use weekplan::error::StoreError;
use weekplan::model::{TaskFields, Weekday};
use weekplan::ops;
use weekplan::planner::{self, Planner};
use weekplan::week::Week;

fn open(root: &Path) -> Planner {
    let db = root.join("planner.db");
    Planner::initialize(db.to_str().unwrap(), &root.join("uploads"))
}

#[test]
fn week_of_tasks_and_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open(dir.path());
    assert!(planner.is_available());

    let standup = planner
        .add_task("2024-06-03", &TaskFields::named("Standup").with_time("09:00"))
        .unwrap();
    let dentist = planner
        .add_task("2024-06-05", &TaskFields::named("Dentist").with_time("14:30"))
        .unwrap();
    // Outside the week; must not show up.
    planner
        .add_task("2024-06-10", &TaskFields::named("Retro"))
        .unwrap();

    let week = Week::containing(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    let (start, end) = week.range_strings();
    assert_eq!((start.as_str(), end.as_str()), ("2024-06-03", "2024-06-09"));

    let tasks = planner.get_tasks_for_week(&start, &end);
    assert_eq!(tasks.len(), 2, "only dates with tasks appear");
    assert_eq!(tasks["2024-06-03"][0].id, standup);
    assert_eq!(tasks["2024-06-05"][0].id, dentist);
    assert!(tasks.values().flatten().all(|t| !t.is_completed));

    planner.update_task_status(dentist, true);
    assert!(planner.get_task(dentist).unwrap().is_completed);
    planner.update_task_status(dentist, false);
    assert!(!planner.get_task(dentist).unwrap().is_completed);

    planner
        .add_schedule_entry(Weekday::Monday, "13:00", "15:00", "Class", "Algebra")
        .unwrap();
    planner
        .add_schedule_entry(Weekday::Monday, "09:00", "12:00", "Work", "")
        .unwrap();
    let monday = planner.get_schedule_for_day(Weekday::Monday);
    let starts: Vec<_> = monday.iter().map(|e| e.start_time.as_str()).collect();
    assert_eq!(starts, ["09:00", "13:00"]);
    assert!(planner.get_schedule_for_day(Weekday::Friday).is_empty());

    planner.shutdown();
    planner.shutdown();
    assert!(!planner.is_available());
    assert!(planner.get_task(standup).is_none());
}

#[test]
fn attachment_follows_task_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let planner = open(dir.path());
    let source = dir.path().join("photo.png");
    fs::write(&source, b"png bytes").unwrap();

    let id = planner
        .add_task_with_attachment("2024-06-04", &TaskFields::named("Print photo"), &source)
        .unwrap();
    let task = planner.get_task(id).unwrap();
    let stored = Path::new(&task.file_path);
    assert_eq!(
        stored.file_name().unwrap().to_str().unwrap(),
        format!("photo_{id}.png")
    );
    assert_eq!(fs::read(stored).unwrap(), b"png bytes");
    assert!(source.exists(), "source is copied, not moved");

    let stored = stored.to_path_buf();
    planner.delete_task(id);
    assert!(planner.get_task(id).is_none());
    assert!(!stored.exists());
}

#[test]
fn strict_calls_distinguish_missing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let planner = open(dir.path());
    let conn = planner.connection().unwrap();

    assert!(matches!(
        ops::get_task(conn, 999),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        ops::update_task_status(conn, 999, true),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        ops::add_task(conn, "2024-06-31", &TaskFields::named("Bad date")),
        Err(StoreError::Invalid(_))
    ));

    let id = ops::add_task(conn, "2024-06-04", &TaskFields::named("Keep file")).unwrap();
    let source = dir.path().join("notes.txt");
    fs::write(&source, "notes").unwrap();
    let dest = planner::attach_file(conn, planner.attachments().unwrap(), id, &source).unwrap();

    // Without a store the copy is left alone.
    planner::delete_task_and_file(conn, None, id).unwrap();
    assert!(dest.exists());
    assert_eq!(ops::count_tasks(conn).unwrap(), 0);
}

#[test]
fn unavailable_store_degrades_to_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the database file should be.
    let db = dir.path().join("planner.db");
    fs::create_dir(&db).unwrap();
    let planner = Planner::initialize(db.to_str().unwrap(), &dir.path().join("uploads"));

    assert!(!planner.is_available());
    assert!(matches!(planner.connection(), Err(StoreError::Unavailable)));
    assert!(planner.add_task("2024-06-03", &TaskFields::named("x")).is_none());
    assert!(planner.get_tasks_for_week("2024-06-03", "2024-06-09").is_empty());
    assert!(planner.get_schedule_for_day(Weekday::Monday).is_empty());
    planner.update_task_status(1, true);
    planner.delete_task(1);
}
