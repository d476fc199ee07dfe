use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, date_label: &str, location: &str, source: &str) {
    let title_line = Line::from(vec![
        Span::styled("  أذان  ", theme::moon().add_modifier(Modifier::BOLD)),
        Span::styled("adzan", theme::moon()),
    ]);

    let info_line = Line::from(vec![
        Span::styled(date_label, theme::teal()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(location, theme::bold()),
        Span::styled(format!(" ({})", source), theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::moon())
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, info_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
