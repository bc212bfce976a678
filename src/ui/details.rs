use crate::api::Student;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub fn render(student: &Student, frame: &mut Frame) {
    let area = frame.area();

    // Layout: fields(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let field = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(format!(" {:<9}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };

    let lines = vec![
        Line::from(""),
        field("ID:", student.id.to_string(), Color::White),
        field("Name:", student.name.clone(), Color::White),
        field("Section:", student.section.clone(), Color::Cyan),
        field("Marks:", student.marks.to_string(), Color::Yellow),
        field("Grade:", student.grade.clone(), Color::Green),
    ];

    let details = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Student Details "),
    );
    frame.render_widget(details, chunks[0]);

    let status_line = Line::from(vec![
        Span::styled(
            " Esc",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(
            "?",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Help"),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[1]);
}
