use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::session::presenter::{LOADING_LABEL, NextPrayerView, UNAVAILABLE_LABEL};
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, view: &NextPrayerView) {
    let block = Block::default()
        .title(Span::styled(" Sholat Berikutnya ", theme::moon()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let content: Vec<Line> = match view {
        NextPrayerView::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", LOADING_LABEL), theme::dim())),
        ],
        NextPrayerView::Unavailable => vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", UNAVAILABLE_LABEL), theme::red())),
            Line::from(Span::styled("  [r] coba lagi", theme::dim())),
        ],
        NextPrayerView::NoTimings => vec![
            Line::from(""),
            Line::from(Span::styled("  --", theme::dim())),
        ],
        NextPrayerView::Upcoming {
            prayer,
            time,
            countdown,
        } => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {}", prayer.label().to_uppercase()),
                    theme::moon().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {}", time), theme::dim()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  dalam  ", theme::dim()),
                Span::styled(countdown.as_str(), theme::amber().add_modifier(Modifier::BOLD)),
            ]),
        ],
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
