use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::paths;

/// Notices writes to the planner database made by other processes, such as
/// a `weekplan done` run from another shell while the grid is open.
pub struct DbWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl DbWatcher {
    /// Watch the directory holding the database. SQLite commits land in the
    /// `-wal` side file, so the database file alone is not enough.
    pub fn start(db_path: &str) -> Result<Self> {
        let (tx, changes) = mpsc::channel();
        let db = db_path.to_string();
        let mut watcher =
            notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                let Ok(event) = res else {
                    return;
                };
                if is_write(&event.kind) && event.paths.iter().any(|p| paths::is_db_file(&db, p))
                {
                    let _ = tx.send(());
                }
            })
            .context("failed to create file watcher")?;

        let dir = paths::db_dir(db_path);
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Whether anything changed since the last call. Pending events are
    /// drained so a burst of writes yields one refresh.
    pub fn changed(&self) -> bool {
        let mut any = false;
        while self.changes.try_recv().is_ok() {
            any = true;
        }
        any
    }
}

// Our own reads show up as access events.
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
