use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::UnicodeWidthChar;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    let students = app.controller.students();

    // Layout: header(3) + table(min) + note(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header_text = format!(
        " Student Result Management   [{} students]   {}",
        students.len(),
        truncate_str(&app.server, (area.width as usize).saturating_sub(45)),
    );
    let header = Paragraph::new(header_text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, chunks[0]);

    // ── Table ──
    let table_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Students ");

    if students.is_empty() {
        let empty = Paragraph::new(Line::from(vec![
            Span::styled(" No students loaded. Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("L", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" to load.", Style::default().fg(Color::DarkGray)),
        ]))
        .block(table_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let header_row = Row::new(["ID", "Name", "Section", "Marks", "Grade"]).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = students
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.id.to_string()).style(Style::default().fg(Color::DarkGray)),
                    Cell::from(s.name.as_str()),
                    Cell::from(s.section.as_str()),
                    Cell::from(s.marks.to_string()).style(Style::default().fg(Color::Yellow)),
                    Cell::from(s.grade.as_str()).style(Style::default().fg(Color::Green)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(16),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(6),
            ],
        )
        .header(header_row)
        .block(table_block.title_bottom(
            Line::from(format!(" {} of {} ", app.list_selected + 1, students.len()))
                .alignment(Alignment::Right),
        ))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

        let mut state = TableState::default().with_selected(Some(app.list_selected));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    // ── Footer note ──
    let note = Paragraph::new(" Data is saved on the server. Press L to reload from the server.")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(note, chunks[2]);

    // ── Status bar ──
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    let mut status = vec![
        key(" l"),
        Span::raw(" Load  "),
        key("a"),
        Span::raw(" Add  "),
        key("e"),
        Span::raw(" Edit  "),
        key("d"),
        Span::raw(" Delete  "),
        key("Enter"),
        Span::raw(" View  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
    ];
    if app.dispatcher.in_flight() > 0 {
        status.push(Span::styled(
            format!("[{} request(s) in flight]", app.dispatcher.in_flight()),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), chunks[3]);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            if max_width > 0 {
                while width + 1 > max_width {
                    match result.pop() {
                        Some(last) => width -= last.width().unwrap_or(0),
                        None => break,
                    }
                }
                result.push('…');
            }
            return result;
        }
        width += w;
        result.push(c);
    }
    result
}
