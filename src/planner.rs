//! Forgiving front end over the storage layer and attachment store.
//!
//! Every operation here returns a sentinel (`None`, an empty collection, or
//! nothing at all) instead of an error, and logs the cause. Callers that need
//! to tell "nothing there" from "store unavailable" use [`Planner::connection`]
//! and the functions in [`crate::ops`] directly.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::attachments::AttachmentStore;
use crate::db;
use crate::error::StoreError;
use crate::model::{ScheduleEntry, Task, TaskFields, Weekday};
use crate::ops::{self, TasksByDate};

pub struct Planner {
    conn: Option<Connection>,
    attachments: Option<AttachmentStore>,
}

impl Planner {
    /// Open the database and the managed upload directory. Failures are
    /// logged and leave the corresponding part unavailable for the lifetime
    /// of the planner.
    pub fn initialize(db_path: &str, upload_dir: &Path) -> Self {
        let conn = match db::open(db_path).and_then(|conn| db::init(&conn).map(|()| conn)) {
            Ok(conn) => {
                info!(path = db_path, "connected to database");
                Some(conn)
            }
            Err(e) => {
                warn!(path = db_path, error = %e, "database unavailable");
                None
            }
        };
        let attachments = match AttachmentStore::open(upload_dir) {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "attachment directory unavailable");
                None
            }
        };
        Self { conn, attachments }
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    pub fn connection(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Unavailable)
    }

    pub fn attachments(&self) -> Option<&AttachmentStore> {
        self.attachments.as_ref()
    }

    fn run<T>(&self, op: &str, f: impl FnOnce(&Connection) -> ops::Result<T>) -> Option<T> {
        let conn = match self.conn.as_ref() {
            Some(conn) => conn,
            None => {
                debug!(op, "skipped: database unavailable");
                return None;
            }
        };
        match f(conn) {
            Ok(v) => Some(v),
            Err(e @ StoreError::NotFound { .. }) => {
                debug!(op, error = %e, "ignored");
                None
            }
            Err(e) => {
                warn!(op, error = %e, "operation failed");
                None
            }
        }
    }

    /// Insert a new, not yet completed task. Returns its id.
    pub fn add_task(&self, date: &str, fields: &TaskFields) -> Option<i64> {
        self.run("add_task", |conn| ops::add_task(conn, date, fields))
    }

    /// Insert a task and attach a copy of `source` named after the new id.
    /// The row is written first so the copy is made exactly once; if the copy
    /// fails the task is kept without an attachment.
    pub fn add_task_with_attachment(
        &self,
        date: &str,
        fields: &TaskFields,
        source: &Path,
    ) -> Option<i64> {
        let fields = TaskFields {
            file_path: String::new(),
            ..fields.clone()
        };
        let id = self.add_task(date, &fields)?;
        self.replace_attachment(id, source);
        Some(id)
    }

    /// Copy `source` as the attachment of task `id` and record the new path.
    pub fn replace_attachment(&self, id: i64, source: &Path) -> Option<PathBuf> {
        let store = self.attachments.as_ref()?;
        self.run("replace_attachment", |conn| {
            attach_file(conn, store, id, source)
        })
    }

    /// Detach the file from task `id`, deleting its managed copy.
    pub fn clear_attachment(&self, id: i64) {
        self.run("clear_attachment", |conn| {
            detach_file(conn, self.attachments.as_ref(), id)
        });
    }

    pub fn get_task(&self, id: i64) -> Option<Task> {
        self.run("get_task", |conn| ops::get_task(conn, id))
    }

    /// Tasks dated `start..=end` grouped by date. Empty when nothing matches
    /// and also when the store is unavailable.
    pub fn get_tasks_for_week(&self, start: &str, end: &str) -> TasksByDate {
        self.run("get_tasks_for_week", |conn| {
            ops::tasks_for_week(conn, start, end)
        })
        .unwrap_or_default()
    }

    pub fn update_task_status(&self, id: i64, completed: bool) {
        self.run("update_task_status", |conn| {
            ops::update_task_status(conn, id, completed)
        });
    }

    pub fn update_task(&self, id: i64, fields: &TaskFields) {
        self.run("update_task", |conn| ops::update_task(conn, id, fields));
    }

    /// Delete a task together with its managed attachment copy.
    pub fn delete_task(&self, id: i64) {
        self.run("delete_task", |conn| {
            delete_task_and_file(conn, self.attachments.as_ref(), id)
        });
    }

    pub fn add_schedule_entry(
        &self,
        day: Weekday,
        start_time: &str,
        end_time: &str,
        entry_type: &str,
        description: &str,
    ) -> Option<i64> {
        self.run("add_schedule_entry", |conn| {
            ops::add_schedule_entry(conn, day, start_time, end_time, entry_type, description)
        })
    }

    pub fn get_schedule_for_day(&self, day: Weekday) -> Vec<ScheduleEntry> {
        self.run("get_schedule_for_day", |conn| ops::schedule_for_day(conn, day))
            .unwrap_or_default()
    }

    /// Copy a file into the managed directory. `None` when the source is
    /// missing, the copy fails or there is no managed directory.
    pub fn upload_file(&self, source: &Path, task_id: Option<i64>) -> Option<PathBuf> {
        let store = self.attachments.as_ref()?;
        match store.store(source, task_id) {
            Ok(dest) => Some(dest),
            Err(e) => {
                warn!(error = %e, "upload failed");
                None
            }
        }
    }

    /// Close the database connection. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close() {
                Ok(()) => info!("database connection closed"),
                Err((_, e)) => warn!(error = %e, "error closing database"),
            }
        }
    }
}

/// Copy `source` in as task `id`'s attachment and record its path. A
/// previous managed copy under a different name is removed.
pub fn attach_file(
    conn: &Connection,
    store: &AttachmentStore,
    id: i64,
    source: &Path,
) -> Result<PathBuf, StoreError> {
    let previous = ops::get_task(conn, id)?;
    let dest = store.store(source, Some(id))?;
    let path = dest.to_string_lossy();
    ops::set_task_file(conn, id, &path)?;
    if previous.has_attachment() && previous.file_path != path {
        remove_quietly(store, &previous.file_path);
    }
    Ok(dest)
}

/// Clear task `id`'s attachment path; with a store, the managed copy is
/// deleted too. Returns whether the task had an attachment.
pub fn detach_file(
    conn: &Connection,
    store: Option<&AttachmentStore>,
    id: i64,
) -> Result<bool, StoreError> {
    let task = ops::get_task(conn, id)?;
    if !task.has_attachment() {
        return Ok(false);
    }
    ops::set_task_file(conn, id, "")?;
    if let Some(store) = store {
        remove_quietly(store, &task.file_path);
    }
    Ok(true)
}

/// Delete task `id`; with a store, its managed attachment copy goes too.
pub fn delete_task_and_file(
    conn: &Connection,
    store: Option<&AttachmentStore>,
    id: i64,
) -> Result<Task, StoreError> {
    let task = ops::delete_task(conn, id)?;
    if let Some(store) = store {
        if task.has_attachment() {
            remove_quietly(store, &task.file_path);
        }
    }
    Ok(task)
}

// The database already reflects the change; a leftover file is only logged.
fn remove_quietly(store: &AttachmentStore, path: &str) {
    if let Err(e) = store.remove(Path::new(path)) {
        warn!(path, error = %e, "failed to remove attachment");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn planner(root: &Path) -> Planner {
        let db_path = root.join("planner.db");
        Planner::initialize(db_path.to_str().unwrap(), &root.join("uploads"))
    }

    #[test]
    fn initialize_creates_database_and_uploads() {
        let root = tempfile::tempdir().unwrap();
        let p = planner(root.path());
        assert!(p.is_available());
        assert!(root.path().join("planner.db").exists());
        assert!(root.path().join("uploads").is_dir());
    }

    #[test]
    fn unavailable_store_degrades_to_sentinels() {
        let root = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let p = Planner::initialize(root.path().to_str().unwrap(), &root.path().join("up"));
        assert!(!p.is_available());
        assert!(matches!(p.connection(), Err(StoreError::Unavailable)));
        assert_eq!(p.add_task("2024-06-10", &TaskFields::named("x")), None);
        assert!(p.get_tasks_for_week("2024-06-10", "2024-06-16").is_empty());
        assert!(p.get_schedule_for_day(Weekday::Monday).is_empty());
        p.update_task_status(1, true);
        p.update_task(1, &TaskFields::named("x"));
        p.delete_task(1);
    }

    #[test]
    fn add_failure_returns_none() {
        let root = tempfile::tempdir().unwrap();
        let p = planner(root.path());
        assert_eq!(p.add_task("2024-06-10", &TaskFields::named("")), None);
        assert!(p.get_tasks_for_week("2024-06-10", "2024-06-10").is_empty());
    }

    #[test]
    fn unknown_ids_are_silent() {
        let root = tempfile::tempdir().unwrap();
        let p = planner(root.path());
        let id = p.add_task("2024-06-10", &TaskFields::named("x")).unwrap();
        p.update_task_status(id + 1, true);
        p.update_task(id + 1, &TaskFields::named("y"));
        p.delete_task(id + 1);
        let task = p.get_task(id).unwrap();
        assert_eq!(task.name, "x");
        assert!(!task.is_completed);
    }

    #[test]
    fn add_with_attachment_names_copy_after_id() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let source = src.path().join("photo.png");
        fs::write(&source, b"img").unwrap();
        let p = planner(root.path());

        let id = p
            .add_task_with_attachment("2024-06-10", &TaskFields::named("Pic"), &source)
            .unwrap();
        let task = p.get_task(id).unwrap();
        assert!(task.file_path.ends_with(&format!("photo_{id}.png")));
        assert_eq!(fs::read(&task.file_path).unwrap(), b"img");
        // only the id-named copy exists
        assert_eq!(fs::read_dir(root.path().join("uploads")).unwrap().count(), 1);
    }

    #[test]
    fn add_with_missing_attachment_keeps_task() {
        let root = tempfile::tempdir().unwrap();
        let p = planner(root.path());
        let id = p
            .add_task_with_attachment(
                "2024-06-10",
                &TaskFields::named("x"),
                &root.path().join("missing.pdf"),
            )
            .unwrap();
        assert_eq!(p.get_task(id).unwrap().file_path, "");
    }

    #[test]
    fn replace_attachment_removes_previous_copy() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let first = src.path().join("a.txt");
        let second = src.path().join("b.txt");
        fs::write(&first, b"a").unwrap();
        fs::write(&second, b"b").unwrap();
        let p = planner(root.path());

        let id = p
            .add_task_with_attachment("2024-06-10", &TaskFields::named("x"), &first)
            .unwrap();
        let old = p.get_task(id).unwrap().file_path;
        let new = p.replace_attachment(id, &second).unwrap();
        assert!(!Path::new(&old).exists());
        assert!(new.exists());
        assert_eq!(p.get_task(id).unwrap().file_path, new.to_string_lossy());
    }

    #[test]
    fn clear_attachment_empties_path_and_file() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let source = src.path().join("a.txt");
        fs::write(&source, b"a").unwrap();
        let p = planner(root.path());

        let id = p
            .add_task_with_attachment("2024-06-10", &TaskFields::named("x"), &source)
            .unwrap();
        let stored = p.get_task(id).unwrap().file_path;
        p.clear_attachment(id);
        assert_eq!(p.get_task(id).unwrap().file_path, "");
        assert!(!Path::new(&stored).exists());
        assert!(source.exists());
    }

    #[test]
    fn clear_attachment_without_upload_dir_still_empties_path() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the uploads directory should be.
        let uploads = root.path().join("uploads");
        fs::write(&uploads, b"").unwrap();
        let db_path = root.path().join("planner.db");
        let p = Planner::initialize(db_path.to_str().unwrap(), &uploads);
        assert!(p.is_available());
        assert!(p.attachments().is_none());

        let mut fields = TaskFields::named("x");
        fields.file_path = "/elsewhere/a.txt".into();
        let id = p.add_task("2024-06-10", &fields).unwrap();
        p.clear_attachment(id);
        assert_eq!(p.get_task(id).unwrap().file_path, "");
    }

    #[test]
    fn delete_removes_managed_attachment_only() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let source = src.path().join("doc.pdf");
        fs::write(&source, b"pdf").unwrap();
        let p = planner(root.path());

        let managed = p
            .add_task_with_attachment("2024-06-10", &TaskFields::named("a"), &source)
            .unwrap();
        let stored = p.get_task(managed).unwrap().file_path;

        let mut external = TaskFields::named("b");
        external.file_path = source.to_string_lossy().into_owned();
        let outside = p.add_task("2024-06-10", &external).unwrap();

        p.delete_task(managed);
        p.delete_task(outside);
        assert!(!Path::new(&stored).exists());
        assert!(source.exists());
        assert!(p.get_tasks_for_week("2024-06-10", "2024-06-10").is_empty());
    }

    #[test]
    fn upload_without_id_then_missing_source() {
        let root = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let source = src.path().join("x.txt");
        fs::write(&source, b"x").unwrap();
        let p = planner(root.path());
        assert!(p.upload_file(&source, None).is_some());
        assert_eq!(p.upload_file(&src.path().join("none.txt"), Some(1)), None);
    }

    #[test]
    fn schedule_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let p = planner(root.path());
        p.add_schedule_entry(Weekday::Wednesday, "14:00", "16:00", "Class", "Math")
            .unwrap();
        p.add_schedule_entry(Weekday::Wednesday, "09:00", "12:00", "Work", "")
            .unwrap();
        let entries = p.get_schedule_for_day(Weekday::Wednesday);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].start_time, "09:00");
    }

    #[test]
    fn shutdown_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let mut p = planner(root.path());
        p.shutdown();
        p.shutdown();
        assert!(!p.is_available());
        assert_eq!(p.add_task("2024-06-10", &TaskFields::named("x")), None);
    }
}
