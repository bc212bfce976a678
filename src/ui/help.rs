use super::centered_percent_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_percent_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Global", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ?         ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("    Ctrl+C    ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  List", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ↑/k ↓/j   ", Style::default().fg(Color::Yellow)),
            Span::raw("Move selection"),
        ]),
        Line::from(vec![
            Span::styled("    g/G       ", Style::default().fg(Color::Yellow)),
            Span::raw("Jump to first/last student"),
        ]),
        Line::from(vec![
            Span::styled("    l         ", Style::default().fg(Color::Yellow)),
            Span::raw("Load students from the server"),
        ]),
        Line::from(vec![
            Span::styled("    a         ", Style::default().fg(Color::Yellow)),
            Span::raw("Add a student"),
        ]),
        Line::from(vec![
            Span::styled("    e         ", Style::default().fg(Color::Yellow)),
            Span::raw("Edit selected student"),
        ]),
        Line::from(vec![
            Span::styled("    d         ", Style::default().fg(Color::Yellow)),
            Span::raw("Delete selected student (asks first)"),
        ]),
        Line::from(vec![
            Span::styled("    Enter/v   ", Style::default().fg(Color::Yellow)),
            Span::raw("View selected student"),
        ]),
        Line::from(vec![
            Span::styled("    q         ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Form", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    Tab/↓     ", Style::default().fg(Color::Yellow)),
            Span::raw("Next field"),
        ]),
        Line::from(vec![
            Span::styled("    S-Tab/↑   ", Style::default().fg(Color::Yellow)),
            Span::raw("Previous field"),
        ]),
        Line::from(vec![
            Span::styled("    Enter     ", Style::default().fg(Color::Yellow)),
            Span::raw("Save"),
        ]),
        Line::from(vec![
            Span::styled("    Esc       ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Details", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    Esc/b     ", Style::default().fg(Color::Yellow)),
            Span::raw("Back to the list"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Dialogs", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    y / n     ", Style::default().fg(Color::Yellow)),
            Span::raw("Confirm or cancel a delete"),
        ]),
        Line::from(vec![
            Span::styled("    Enter     ", Style::default().fg(Color::Yellow)),
            Span::raw("Dismiss a message"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Changes are not shown until the list is loaded again.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
