//! Location of the planner database and the managed attachment directory.
//!
//! Both can be set on the command line or through `WEEKPLAN_DB` and
//! `WEEKPLAN_UPLOADS`. Uploads default to an `uploads/` directory next to the
//! database file so that the two always travel together.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DB_FILE_NAME: &str = "planner.db";
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// `$HOME/.weekplan/planner.db`
pub fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".weekplan").join(DB_FILE_NAME))
}

pub fn resolve_db_path(cli_db: Option<String>) -> Result<String> {
    match cli_db {
        Some(p) => Ok(p),
        None => {
            let path = default_db_path()?;
            Ok(path
                .to_str()
                .context("default DB path is not valid UTF-8")?
                .to_string())
        }
    }
}

pub fn resolve_upload_dir(cli_uploads: Option<PathBuf>, db_path: &str) -> PathBuf {
    cli_uploads.unwrap_or_else(|| {
        Path::new(db_path)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(UPLOADS_DIR_NAME)
    })
}

pub fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// SQLite side files that sit next to the database while it is open.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Directory holding the database and its side files. `.` for a bare name.
pub fn db_dir(db_path: &str) -> &Path {
    match Path::new(db_path).parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// True when `candidate` is the database file or one of its side files.
pub fn is_db_file(db_path: &str, candidate: &Path) -> bool {
    let (Some(db_name), Some(name)) = (Path::new(db_path).file_name(), candidate.file_name())
    else {
        return false;
    };
    let name = name.to_string_lossy();
    match name.strip_prefix(&*db_name.to_string_lossy()) {
        Some("") => true,
        Some(rest) => SIDE_FILE_SUFFIXES.contains(&rest),
        None => false,
    }
}
