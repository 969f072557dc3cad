use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension};

use crate::error::StoreError;
use crate::model::{ScheduleEntry, Task, TaskFields, Weekday};
use crate::validate::{validate_date, validate_name};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Tasks grouped by `YYYY-MM-DD` date, each list ordered by time.
pub type TasksByDate = BTreeMap<String, Vec<Task>>;

const TASK_COLUMNS: &str =
    "id, date, name, description, time, location, file_path, is_completed";

const SCHEDULE_COLUMNS: &str = "id, day_of_week, start_time, end_time, type, description";

const INSERT_TASK: &str = "
INSERT INTO tasks (date, name, description, time, location, file_path, is_completed)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
";

const UPDATE_TASK: &str = "
UPDATE tasks
SET name = ?1, description = ?2, time = ?3, location = ?4, file_path = ?5
WHERE id = ?6
";

const INSERT_SCHEDULE: &str = "
INSERT INTO schedule (day_of_week, start_time, end_time, type, description)
VALUES (?1, ?2, ?3, ?4, ?5)
";

const UPDATE_SCHEDULE: &str = "
UPDATE schedule
SET day_of_week = ?1, start_time = ?2, end_time = ?3, type = ?4, description = ?5
WHERE id = ?6
";

// Monday-first ordering for listing the whole schedule.
const WEEKDAY_ORDER: &str = "CASE day_of_week
    WHEN 'Monday' THEN 0 WHEN 'Tuesday' THEN 1 WHEN 'Wednesday' THEN 2
    WHEN 'Thursday' THEN 3 WHEN 'Friday' THEN 4 WHEN 'Saturday' THEN 5
    WHEN 'Sunday' THEN 6 ELSE 7 END";

// Text columns other than `name` are nullable in databases written by
// earlier versions; absent values read back as empty strings.
fn text(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn read_task_row(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        date: row.get(1)?,
        name: row.get(2)?,
        description: text(row, 3)?,
        time: text(row, 4)?,
        location: text(row, 5)?,
        file_path: text(row, 6)?,
        is_completed: row.get(7)?,
    })
}

fn read_schedule_row(row: &rusqlite::Row) -> rusqlite::Result<ScheduleEntry> {
    Ok(ScheduleEntry {
        id: row.get(0)?,
        day_of_week: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        entry_type: row.get(4)?,
        description: text(row, 5)?,
    })
}

fn require_rows(rows: usize, not_found: StoreError) -> Result<()> {
    if rows == 0 {
        return Err(not_found);
    }
    Ok(())
}

pub fn add_task(conn: &Connection, date: &str, fields: &TaskFields) -> Result<i64> {
    validate_date(date)?;
    validate_name(&fields.name)?;
    conn.execute(
        INSERT_TASK,
        rusqlite::params![
            date,
            fields.name,
            fields.description,
            fields.time,
            fields.location,
            fields.file_path
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
    conn.query_row(&sql, [id], read_task_row)
        .optional()?
        .ok_or_else(|| StoreError::task_not_found(id))
}

/// Tasks with `start <= date <= end`, grouped by date. Within a date tasks
/// are ordered by their time string, so tasks without a time come first.
pub fn tasks_for_week(conn: &Connection, start: &str, end: &str) -> Result<TasksByDate> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date, time, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map([start, end], read_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut by_date = TasksByDate::new();
    for task in tasks {
        by_date.entry(task.date.clone()).or_default().push(task);
    }
    Ok(by_date)
}

pub fn update_task_status(conn: &Connection, id: i64, completed: bool) -> Result<()> {
    let rows = conn.execute(
        "UPDATE tasks SET is_completed = ?1 WHERE id = ?2",
        rusqlite::params![completed, id],
    )?;
    require_rows(rows, StoreError::task_not_found(id))
}

/// Overwrite every mutable field. The date is fixed at creation.
pub fn update_task(conn: &Connection, id: i64, fields: &TaskFields) -> Result<()> {
    validate_name(&fields.name)?;
    let rows = conn.execute(
        UPDATE_TASK,
        rusqlite::params![
            fields.name,
            fields.description,
            fields.time,
            fields.location,
            fields.file_path,
            id
        ],
    )?;
    require_rows(rows, StoreError::task_not_found(id))
}

pub fn set_task_file(conn: &Connection, id: i64, file_path: &str) -> Result<()> {
    let rows = conn.execute(
        "UPDATE tasks SET file_path = ?1 WHERE id = ?2",
        rusqlite::params![file_path, id],
    )?;
    require_rows(rows, StoreError::task_not_found(id))
}

/// Remove a task row and return it. Attachment files are left alone.
pub fn delete_task(conn: &Connection, id: i64) -> Result<Task> {
    let task = get_task(conn, id)?;
    conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    Ok(task)
}

pub fn add_schedule_entry(
    conn: &Connection,
    day: Weekday,
    start_time: &str,
    end_time: &str,
    entry_type: &str,
    description: &str,
) -> Result<i64> {
    check_schedule_fields(start_time, end_time, entry_type)?;
    conn.execute(
        INSERT_SCHEDULE,
        rusqlite::params![day.as_str(), start_time, end_time, entry_type, description],
    )?;
    Ok(conn.last_insert_rowid())
}

fn check_schedule_fields(start_time: &str, end_time: &str, entry_type: &str) -> Result<()> {
    if start_time.is_empty() || end_time.is_empty() {
        return Err(StoreError::Invalid(
            "schedule entries need a start and end time".into(),
        ));
    }
    if entry_type.trim().is_empty() {
        return Err(StoreError::Invalid(
            "schedule entry type must not be empty".into(),
        ));
    }
    Ok(())
}

pub fn get_schedule_entry(conn: &Connection, id: i64) -> Result<ScheduleEntry> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule WHERE id = ?1");
    conn.query_row(&sql, [id], read_schedule_row)
        .optional()?
        .ok_or_else(|| StoreError::schedule_not_found(id))
}

pub fn schedule_for_day(conn: &Connection, day: Weekday) -> Result<Vec<ScheduleEntry>> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedule
         WHERE day_of_week = ?1
         ORDER BY start_time, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map([day.as_str()], read_schedule_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

pub fn list_schedule(conn: &Connection) -> Result<Vec<ScheduleEntry>> {
    let sql = format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedule
         ORDER BY {WEEKDAY_ORDER}, start_time, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let entries = stmt
        .query_map([], read_schedule_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}

pub fn update_schedule_entry(conn: &Connection, entry: &ScheduleEntry) -> Result<()> {
    let day = Weekday::parse(&entry.day_of_week)?;
    check_schedule_fields(&entry.start_time, &entry.end_time, &entry.entry_type)?;
    let rows = conn.execute(
        UPDATE_SCHEDULE,
        rusqlite::params![
            day.as_str(),
            entry.start_time,
            entry.end_time,
            entry.entry_type,
            entry.description,
            entry.id
        ],
    )?;
    require_rows(rows, StoreError::schedule_not_found(entry.id))
}

pub fn delete_schedule_entry(conn: &Connection, id: i64) -> Result<()> {
    let rows = conn.execute("DELETE FROM schedule WHERE id = ?1", [id])?;
    require_rows(rows, StoreError::schedule_not_found(id))
}

pub fn count_tasks(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?)
}
