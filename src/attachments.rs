//! Copies of user-selected files kept in an application-owned directory.
//!
//! A stored copy is named after the original file with a suffix appended to
//! the stem: the owning task id when it is known (`photo_42.png`), otherwise
//! a local timestamp (`photo_20240610093000.png`). The source file is never
//! modified.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::AttachmentError;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub type Result<T> = std::result::Result<T, AttachmentError>;

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    /// Use `dir` as the managed directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| AttachmentError::Io {
            path: dir.clone(),
            source,
        })?;
        let dir = fs::canonicalize(&dir).map_err(|source| AttachmentError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the managed directory and return the absolute
    /// destination path. An existing copy with the same name is replaced.
    pub fn store(&self, source: &Path, task_id: Option<i64>) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(AttachmentError::MissingSource(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| AttachmentError::NoFileName(source.to_path_buf()))?;

        let suffix = match task_id {
            Some(id) => id.to_string(),
            None => Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        let dest = self.dir.join(unique_name(Path::new(file_name), &suffix));

        fs::copy(source, &dest).map_err(|source_err| AttachmentError::Copy {
            from: source.to_path_buf(),
            to: dest.clone(),
            source: source_err,
        })?;
        copy_mtime(source, &dest)?;
        tracing::debug!(from = %source.display(), to = %dest.display(), "stored attachment");
        Ok(dest)
    }

    /// True when `path` names a file inside the managed directory.
    pub fn is_managed(&self, path: &Path) -> bool {
        path.parent()
            .and_then(|p| fs::canonicalize(p).ok())
            .is_some_and(|p| p == self.dir)
    }

    /// Delete a stored copy. Paths outside the managed directory and files
    /// that are already gone are ignored; returns whether a file was removed.
    pub fn remove(&self, path: &Path) -> Result<bool> {
        if !self.is_managed(path) || !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(|source| AttachmentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "removed attachment");
        Ok(true)
    }
}

/// `{stem}_{suffix}{.ext}`, splitting at the last dot of the file name.
/// Dotfiles such as `.bashrc` have no extension.
pub fn unique_name(file_name: &Path, suffix: &str) -> String {
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.extension() {
        Some(ext) => format!("{stem}_{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{suffix}"),
    }
}

fn copy_mtime(from: &Path, to: &Path) -> Result<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| AttachmentError::Io { path, source }
    };
    let modified = fs::metadata(from)
        .and_then(|m| m.modified())
        .map_err(io_err(from))?;
    fs::File::options()
        .write(true)
        .open(to)
        .and_then(|f| f.set_modified(modified))
        .map_err(io_err(to))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn write_source(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn unique_name_inserts_suffix_before_extension() {
        assert_eq!(unique_name(Path::new("photo.png"), "42"), "photo_42.png");
        assert_eq!(unique_name(Path::new("archive.tar.gz"), "7"), "archive.tar_7.gz");
        assert_eq!(unique_name(Path::new("README"), "7"), "README_7");
        assert_eq!(unique_name(Path::new(".bashrc"), "7"), ".bashrc_7");
    }

    #[test]
    fn open_creates_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("data").join("uploads");
        let store = AttachmentStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert!(store.dir().is_absolute());
    }

    #[test]
    fn store_with_task_id() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let store = AttachmentStore::open(root.path().join("uploads")).unwrap();
        let source = write_source(src_dir.path(), "photo.png", b"\x89PNG data");

        let dest = store.store(&source, Some(42)).unwrap();
        assert!(dest.ends_with("photo_42.png"));
        assert!(dest.is_absolute());
        assert_eq!(dest.parent().unwrap(), store.dir());
        assert_eq!(fs::read(&dest).unwrap(), b"\x89PNG data");
        // source untouched
        assert_eq!(fs::read(&source).unwrap(), b"\x89PNG data");
    }

    #[test]
    fn store_without_task_id_uses_timestamp() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let store = AttachmentStore::open(root.path()).unwrap();
        let source = write_source(src_dir.path(), "notes.txt", b"hello");

        let dest = store.store(&source, None).unwrap();
        let name = dest.file_name().unwrap().to_string_lossy().into_owned();
        let stamp = name
            .strip_prefix("notes_")
            .and_then(|s| s.strip_suffix(".txt"))
            .unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn store_preserves_modification_time() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let store = AttachmentStore::open(root.path()).unwrap();
        let source = write_source(src_dir.path(), "old.txt", b"x");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs::File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let dest = store.store(&source, Some(1)).unwrap();
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn store_missing_source_fails_without_side_effects() {
        let root = tempfile::tempdir().unwrap();
        let store = AttachmentStore::open(root.path()).unwrap();
        let err = store
            .store(&root.path().join("nope.png"), Some(1))
            .unwrap_err();
        assert!(matches!(err, AttachmentError::MissingSource(_)));
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn remove_only_touches_managed_files() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let store = AttachmentStore::open(root.path()).unwrap();
        let source = write_source(src_dir.path(), "a.txt", b"a");
        let dest = store.store(&source, Some(3)).unwrap();

        assert!(!store.remove(&source).unwrap());
        assert!(source.exists());

        assert!(store.remove(&dest).unwrap());
        assert!(!dest.exists());
        assert!(!store.remove(&dest).unwrap());
    }
}
