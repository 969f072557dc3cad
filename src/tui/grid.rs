use std::path::Path;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{App, Form, Mode};
use crate::model::{ScheduleEntry, Task};
use crate::theme;
use crate::week::day_label;

const HINT: &str = "h/l: day  j/k: task  [/]: week  a: add  e: edit  space: done  d: delete  o: open  s: schedule  ?: help  q: quit";

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_week(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);

    match &app.mode {
        Mode::Help => render_help(frame),
        Mode::ConfirmDelete { name, .. } => render_confirm(frame, name),
        Mode::Normal => {}
    }
    if let Some(form) = &app.form {
        render_form(frame, form);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled("[ ", theme::nav_hint()),
        Span::styled(app.week.title(), theme::title()),
        Span::styled(" ]", theme::nav_hint()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_week(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area);

    for (i, date) in app.week.days().into_iter().enumerate() {
        let border = if i == app.day {
            theme::selected_day_border()
        } else if date == app.today {
            theme::today_border()
        } else {
            theme::day_border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(format!(" {} ", day_label(date)), theme::day_header()));

        let schedule = &app.schedule[i];
        let tasks = app.day_tasks(i);
        let mut items: Vec<ListItem> = schedule.iter().map(schedule_item).collect();
        items.extend(tasks.iter().map(task_item));

        let mut state = ListState::default();
        if i == app.day && !tasks.is_empty() {
            state.select(Some(schedule.len() + app.cursor));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selection());
        frame.render_stateful_widget(list, columns[i], &mut state);
    }
}

fn schedule_item(entry: &ScheduleEntry) -> ListItem<'static> {
    ListItem::new(Line::styled(
        format!("{}-{} {}", entry.start_time, entry.end_time, entry.entry_type),
        theme::schedule_block(),
    ))
}

fn task_item(task: &Task) -> ListItem<'static> {
    let name_style = if task.is_completed {
        theme::completed_task()
    } else {
        theme::task()
    };
    let mut first = vec![Span::raw(if task.is_completed { "[x] " } else { "[ ] " })];
    if !task.time.is_empty() {
        first.push(Span::styled(format!("{} ", task.time), theme::task_time()));
    }
    first.push(Span::styled(task.name.clone(), name_style));

    let mut lines = vec![Line::from(first)];
    if !task.location.is_empty() {
        lines.push(Line::styled(
            format!("    @ {}", task.location),
            theme::location(),
        ));
    }
    if task.has_attachment() {
        let name = Path::new(&task.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| task.file_path.clone());
        lines.push(Line::styled(format!("    + {name}"), theme::attachment()));
    }
    ListItem::new(lines)
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let para = if let Some(err) = &app.error {
        Paragraph::new(err.as_str()).style(theme::error())
    } else if let Some(msg) = &app.message {
        Paragraph::new(msg.as_str())
    } else {
        Paragraph::new(HINT).style(theme::hint())
    };
    frame.render_widget(para, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_confirm(frame: &mut Frame, task_name: &str) {
    let term = frame.area();
    let width = 50.min(term.width.saturating_sub(4));
    let height = 5.min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm Deletion ")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(vec![
            Span::raw("Delete task "),
            Span::styled(task_name, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

fn render_help(frame: &mut Frame) {
    let lines = [
        "h / l, arrows   previous / next day",
        "j / k           previous / next task",
        "[ / ]           previous / next week",
        "t               jump to today",
        "a               add task on selected day",
        "e, Enter        edit selected task",
        "space, x        toggle completion",
        "d               delete selected task",
        "o               open attachment",
        "s               add schedule block",
        "r               reload",
        "q, Esc          quit",
        "",
        "In forms: Tab/Shift-Tab move, Enter saves, Esc cancels,",
        "Ctrl-U clears a field, Ctrl-E edits description in $EDITOR.",
    ];
    let term = frame.area();
    let width = 64.min(term.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);
    frame.render_widget(Clear, area);
    let text: Vec<Line> = lines.iter().map(|l| Line::raw(*l)).collect();
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keys ")
                .border_style(theme::nav_hint()),
        ),
        area,
    );
}

fn render_form(frame: &mut Frame, form: &Form) {
    let term = frame.area();
    let width = 64.min(term.width.saturating_sub(4));
    // label + input per field, optional error, hint
    let content_rows = form.fields.len() as u16 * 2 + 1 + u16::from(form.error.is_some());
    let height = (content_rows + 2).min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(form.title())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(1); form.fields.len() * 2];
    if form.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut idx = 0;
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focused;
        let label_style = if focused {
            theme::focused_label()
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(field.label).style(label_style), chunks[idx]);
        idx += 1;
        let cursor = if focused { "_" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("  {}{cursor}", field.value)).wrap(Wrap { trim: false }),
            chunks[idx],
        );
        idx += 1;
    }

    if let Some(err) = &form.error {
        frame.render_widget(Paragraph::new(err.as_str()).style(theme::error()), chunks[idx]);
        idx += 1;
    }
    frame.render_widget(
        Paragraph::new("Tab: next field  Enter: save  Esc: cancel").style(theme::hint()),
        chunks[idx],
    );
}
