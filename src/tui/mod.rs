mod app;
mod editor;
mod event;
mod grid;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use crate::planner::Planner;
use crate::watch::DbWatcher;
use app::App;
use event::KeyAction;

/// Run the interactive week grid until the user quits.
pub fn run(db_path: &str, planner: &Planner, poll_interval: u64) -> Result<()> {
    let mut app = App::new(planner, chrono::Local::now().date_naive());

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, db_path, planner, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db_path: &str,
    planner: &Planner,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    // Pick up writes from other processes; the grid still works without it.
    let watcher = match DbWatcher::start(db_path) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "database watcher unavailable");
            None
        }
    };

    loop {
        terminal.draw(|frame| grid::render(frame, app))?;

        if ct_event::poll(poll_duration)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Submit => app.submit_form(planner),
                        KeyAction::OpenEditor => edit_description(terminal, app),
                        KeyAction::OpenAttachment => {
                            if let Some(task) = app.selected_task() {
                                if task.has_attachment() {
                                    let result = editor::open_attachment(Path::new(&task.file_path));
                                    app.error = result.err().map(|e| e.to_string());
                                }
                            }
                        }
                        KeyAction::ToggleDone => app.toggle_selected(planner),
                        KeyAction::ConfirmDelete => app.confirm_delete(planner),
                        KeyAction::PrevWeek => app.prev_week(planner),
                        KeyAction::NextWeek => app.next_week(planner),
                        KeyAction::Today => app.go_today(planner),
                        KeyAction::Left => app.move_left(planner),
                        KeyAction::Right => app.move_right(planner),
                        KeyAction::Refresh => app.refresh(planner),
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        if watcher.as_ref().is_some_and(DbWatcher::changed) {
            app.refresh(planner);
        }
    }
}

fn edit_description(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) {
    let Some(form) = app.form.as_mut() else {
        return;
    };
    let initial = form.focused_buf_mut().clone();
    match editor::open_editor(terminal, &initial) {
        Ok(content) => {
            *form.focused_buf_mut() = content.trim_end().to_string();
            form.error = None;
        }
        Err(e) => form.error = Some(e.to_string()),
    }
}
