use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Notification, NotificationIcon};
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, note: &Notification) {
    let accent = match note.icon {
        NotificationIcon::Adhan => theme::moon(),
        NotificationIcon::Alarm => theme::amber(),
        NotificationIcon::Info => theme::teal(),
    };

    let line = Line::from(vec![
        Span::styled(format!("{}  ", note.icon.glyph()), accent),
        Span::styled(note.message.as_str(), accent.add_modifier(Modifier::BOLD)),
        Span::styled("   [x] tutup", theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .style(theme::surface());

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
