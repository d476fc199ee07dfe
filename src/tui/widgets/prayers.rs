use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::session::presenter::ScheduleRow;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, rows: &[ScheduleRow]) {
    let block = Block::default()
        .title(Span::styled(" Jadwal Hari Ini ", theme::moon()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let time = row.time.as_deref().unwrap_or("--:--");

            let (marker, name_style) = if row.is_next {
                ("▶", theme::moon().add_modifier(Modifier::BOLD))
            } else if row.passed {
                ("·", theme::dim())
            } else {
                (" ", theme::bold())
            };

            let time_style = if row.is_next {
                theme::amber().add_modifier(Modifier::BOLD)
            } else {
                theme::dim()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", marker), theme::teal()),
                Span::styled(format!("{:<9}", row.prayer.label()), name_style),
                Span::styled(time.to_string(), time_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
