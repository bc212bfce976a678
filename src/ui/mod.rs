mod confirm;
mod details;
pub mod form;
mod help;
mod list;
mod notice;

use crate::app::App;
use crate::controller::{FormMode, Screen};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    match app.controller.screen() {
        Screen::List => list::render(app, frame),
        Screen::Form(mode) => {
            if let Some(form) = &app.form {
                let title = match mode {
                    FormMode::Add => "Add Student".to_string(),
                    FormMode::Edit(student) => format!("Edit Student (ID {})", student.id),
                };
                form.render(frame, &title);
            }
        }
        Screen::Details(student) => details::render(student, frame),
    }

    // Overlays, lowest first
    if app.show_help {
        help::render(frame);
    }
    if let Some(student) = app.controller.confirmation() {
        confirm::render(student, frame);
    }
    if let Some(notice) = app.controller.notice() {
        notice::render(notice, frame);
    }
}

/// Centered rectangle `percent_x` wide and `height` rows tall.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Centered rectangle using percentage of parent area.
fn centered_percent_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
