use crate::api::{Student, StudentDraft};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use super::centered_rect;

/// Editable fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Section,
    Marks,
    Grade,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Section,
            Self::Section => Self::Marks,
            Self::Marks => Self::Grade,
            Self::Grade => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Grade,
            Self::Section => Self::Name,
            Self::Marks => Self::Section,
            Self::Grade => Self::Marks,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Section => "Section",
            Self::Marks => "Marks",
            Self::Grade => "Grade",
        }
    }

    pub const ALL: [FormField; 4] = [Self::Name, Self::Section, Self::Marks, Self::Grade];
}

/// Result of a key press in the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// User submitted a valid draft
    Submit(StudentDraft),
    /// User left the form
    Cancel,
}

/// Local draft of a student being added or edited.
#[derive(Debug, Clone)]
pub struct StudentForm {
    name: String,
    section: String,
    marks: String,
    grade: String,
    active: FormField,
    error: Option<String>,
    saving: bool,
}

impl StudentForm {
    /// Empty draft for adding a student
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            section: String::new(),
            marks: String::new(),
            grade: String::new(),
            active: FormField::Name,
            error: None,
            saving: false,
        }
    }

    /// Draft pre-filled from an existing record
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            section: student.section.clone(),
            marks: student.marks.to_string(),
            grade: student.grade.clone(),
            ..Self::empty()
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Section => &self.section,
            FormField::Marks => &self.marks,
            FormField::Grade => &self.grade,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Section => &mut self.section,
            FormField::Marks => &mut self.marks,
            FormField::Grade => &mut self.grade,
        }
    }

    pub fn active(&self) -> FormField {
        self.active
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this form has handed a draft off for saving.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Build the draft. Marks must be numeric; everything else is passed on
    /// exactly as typed.
    pub fn submit(&mut self) -> Option<StudentDraft> {
        match self.marks.trim().parse::<f64>() {
            Ok(marks) if marks.is_finite() => {
                self.error = None;
                self.saving = true;
                Some(StudentDraft {
                    name: self.name.clone(),
                    section: self.section.clone(),
                    marks,
                    grade: self.grade.clone(),
                })
            }
            _ => {
                self.error = Some("Marks must be a number".to_string());
                self.active = FormField::Marks;
                None
            }
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormAction> {
        match key.code {
            KeyCode::Enter => self.submit().map(FormAction::Submit),
            KeyCode::Esc => Some(FormAction::Cancel),
            KeyCode::Tab | KeyCode::Down => {
                self.active = self.active.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = self.active.prev();
                None
            }
            KeyCode::Backspace => {
                self.value_mut(self.active).pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.active == FormField::Marks && !(c.is_ascii_digit() || c == '.' || c == '-') {
                    return None;
                }
                self.value_mut(self.active).push(c);
                self.error = None;
                None
            }
            _ => None,
        }
    }

    /// Render the form
    pub fn render(&self, frame: &mut Frame, title: &str) {
        let area = centered_rect(60, 12, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label_width = 10;
        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| {
                let style = if *field == self.active() {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {:<width$}", format!("{}:", field.label()), width = label_width - 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(self.value(*field), style),
                ])
            })
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = self.error() {
            lines.push(Line::from(Span::styled(
                format!(" {}", error),
                Style::default().fg(Color::Red),
            )));
        } else if self.is_saving() {
            lines.push(Line::from(Span::styled(
                " Saving...",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                " Enter: Save | Tab: Next field | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let row = FormField::ALL
            .iter()
            .position(|f| *f == self.active)
            .unwrap_or(0) as u16;
        let cursor_x = inner.x + label_width as u16 + self.value(self.active).width() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y + row));
    }
}
