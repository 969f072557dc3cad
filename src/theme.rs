//! Colours and text styles for the week grid.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Green;
pub const HEADING: Color = Color::Rgb(0x2c, 0x3e, 0x50);
pub const MUTED: Color = Color::DarkGray;

pub fn title() -> Style {
    Style::default().fg(HEADING).add_modifier(Modifier::BOLD)
}

pub fn nav_hint() -> Style {
    Style::default().fg(ACCENT)
}

pub fn day_border() -> Style {
    Style::default().fg(MUTED)
}

pub fn day_header() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn today_border() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected_day_border() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn task() -> Style {
    Style::default()
}

pub fn completed_task() -> Style {
    Style::default()
        .fg(MUTED)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn task_time() -> Style {
    Style::default().fg(Color::Blue)
}

pub fn location() -> Style {
    Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
}

pub fn attachment() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn schedule_block() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
}

pub fn selection() -> Style {
    Style::default().bg(Color::DarkGray)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red)
}

pub fn hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn focused_label() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}
