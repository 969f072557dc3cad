use std::io::{self, Write as _};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Edit `initial` in `$EDITOR` with the grid hidden. Returns the saved text.
pub fn open_editor(terminal: &mut Term, initial: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").context("$EDITOR is not set")?;
    suspended(terminal, || edit_text(&editor, initial))
}

/// Run `f` on the normal screen, then bring the grid back whatever `f`
/// returned.
fn suspended<T>(terminal: &mut Term, f: impl FnOnce() -> Result<T>) -> Result<T> {
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    let result = f();
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal::enable_raw_mode()?;
    terminal.clear()?;
    result
}

/// Write `initial` to a scratch file, run `editor` on it and read it back.
fn edit_text(editor: &str, initial: &str) -> Result<String> {
    let mut scratch = tempfile::Builder::new()
        .prefix("weekplan-note-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create scratch file")?;
    scratch.write_all(initial.as_bytes())?;
    scratch.flush()?;

    let status = Command::new(editor)
        .arg(scratch.path())
        .status()
        .with_context(|| format!("failed to run editor '{editor}'"))?;
    if !status.success() {
        bail!("editor exited with status {status}");
    }
    std::fs::read_to_string(scratch.path()).context("failed to read back edited text")
}

fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Hand an attachment to the desktop's default application without waiting.
pub fn open_attachment(path: &Path) -> Result<()> {
    if !path.is_file() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bail!(
            "file not found: '{name}' could not be found at '{}'; it may have been moved or deleted",
            path.display()
        );
    }
    let program = opener();
    Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run '{program}'"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn edit_text_returns_file_contents() {
        // `true` leaves the file alone.
        assert_eq!(edit_text("true", "checkup at 3").unwrap(), "checkup at 3");
        assert!(edit_text("false", "x").is_err());
        assert!(edit_text("/nonexistent/editor", "x").is_err());
    }

    #[test]
    fn open_missing_attachment_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_attachment(&dir.path().join("gone.pdf")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("file not found"));
        assert!(msg.contains("gone.pdf"));
    }
}
