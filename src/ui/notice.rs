use crate::controller::{Notice, NoticeKind};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;

/// Render a blocking notice. It stays up until dismissed.
pub fn render(notice: &Notice, frame: &mut Frame) {
    let popup = centered_rect(60, 8, frame.area());

    let (title, color) = match notice.kind {
        NoticeKind::Info => (" Notice ", Color::Cyan),
        NoticeKind::Error => (" Error ", Color::Red),
    };

    let lines = vec![
        Line::from(""),
        Line::from(notice.message.as_str()),
        Line::from(""),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title)
                .title_bottom(
                    Line::from(" Press Enter to continue ")
                        .style(Style::default().fg(Color::DarkGray)),
                ),
        );

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
