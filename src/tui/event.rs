use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

/// Result of handling a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    OpenEditor,
    OpenAttachment,
    ToggleDone,
    ConfirmDelete,
    PrevWeek,
    NextWeek,
    Today,
    Left,
    Right,
    Refresh,
    Continue,
}

/// Handle a key press. Returns an action for the event loop; pure cursor and
/// form edits are applied directly.
pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    if app.form.is_some() {
        return handle_form(app, key);
    }

    match app.mode {
        Mode::ConfirmDelete { .. } => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::ConfirmDelete,
                _ => {
                    app.cancel_delete();
                    KeyAction::Continue
                }
            };
        }
        Mode::Help => {
            app.mode = Mode::Normal;
            return KeyAction::Continue;
        }
        Mode::Normal => {}
    }

    app.message = None;
    app.error = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            KeyAction::Continue
        }
        KeyCode::Char('h') | KeyCode::Left => KeyAction::Left,
        KeyCode::Char('l') | KeyCode::Right => KeyAction::Right,
        KeyCode::Char('[') | KeyCode::PageUp => KeyAction::PrevWeek,
        KeyCode::Char(']') | KeyCode::PageDown => KeyAction::NextWeek,
        KeyCode::Char('t') => KeyAction::Today,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char(' ') | KeyCode::Char('x') => KeyAction::ToggleDone,
        KeyCode::Char('o') => KeyAction::OpenAttachment,
        KeyCode::Char('a') => {
            app.enter_add_task();
            KeyAction::Continue
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            app.enter_edit_task();
            KeyAction::Continue
        }
        KeyCode::Char('s') => {
            app.enter_add_schedule();
            KeyAction::Continue
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete();
            KeyAction::Continue
        }
        KeyCode::Char('?') => {
            app.mode = Mode::Help;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn handle_form(app: &mut App, key: KeyEvent) -> KeyAction {
    let Some(form) = app.form.as_mut() else {
        return KeyAction::Continue;
    };
    match key.code {
        KeyCode::Esc => {
            app.cancel_form();
            KeyAction::Continue
        }
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
            KeyAction::Continue
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            KeyAction::Continue
        }
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => {
            form.focused_buf_mut().pop();
            form.error = None;
            KeyAction::Continue
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
            'e' if form.focused_is_description() => KeyAction::OpenEditor,
            'u' => {
                form.focused_buf_mut().clear();
                form.error = None;
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        },
        KeyCode::Char(c) => {
            form.focused_buf_mut().push(c);
            form.error = None;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Planner;
    use crate::tui::app::NAME;
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app(root: &std::path::Path) -> (Planner, App) {
        let db = root.join("planner.db");
        let planner = Planner::initialize(db.to_str().unwrap(), &root.join("uploads"));
        let app = App::new(&planner, NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
        (planner, app)
    }

    #[test]
    fn typing_fills_focused_field() {
        let root = tempfile::tempdir().unwrap();
        let (_p, mut app) = app(root.path());
        handle_key(&mut app, key(KeyCode::Char('a')));
        for c in "Gym".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        handle_key(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.form.as_ref().unwrap().fields[NAME].value, "Gy");

        handle_key(&mut app, ctrl('u'));
        assert_eq!(app.form.as_ref().unwrap().fields[NAME].value, "");

        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), KeyAction::Submit);
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.form.is_none());
    }

    #[test]
    fn ctrl_e_only_on_description() {
        let root = tempfile::tempdir().unwrap();
        let (_p, mut app) = app(root.path());
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert_eq!(handle_key(&mut app, ctrl('e')), KeyAction::Continue);
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(handle_key(&mut app, ctrl('e')), KeyAction::OpenEditor);
    }

    #[test]
    fn delete_needs_confirmation() {
        let root = tempfile::tempdir().unwrap();
        let (p, _) = app(root.path());
        p.add_task("2024-06-12", &crate::model::TaskFields::named("t"))
            .unwrap();
        let mut app = App::new(&p, NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('n'))), KeyAction::Continue);
        assert_eq!(app.mode, Mode::Normal);

        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('y'))),
            KeyAction::ConfirmDelete
        );
    }

    #[test]
    fn next_key_clears_status_error() {
        let root = tempfile::tempdir().unwrap();
        let (_p, mut app) = app(root.path());
        app.error = Some("file not found: 'gone.pdf'".into());
        app.message = Some("Added 'x'".into());
        handle_key(&mut app, key(KeyCode::Char('j')));
        assert!(app.error.is_none());
        assert!(app.message.is_none());
    }

    #[test]
    fn navigation_keys_map_to_actions() {
        let root = tempfile::tempdir().unwrap();
        let (_p, mut app) = app(root.path());
        assert_eq!(handle_key(&mut app, key(KeyCode::Char(']'))), KeyAction::NextWeek);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('['))), KeyAction::PrevWeek);
        assert_eq!(handle_key(&mut app, key(KeyCode::Left)), KeyAction::Left);
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), KeyAction::Quit);
    }
}
