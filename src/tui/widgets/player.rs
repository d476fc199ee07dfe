use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::audio::{MusicPlayer, MusicStream};
use crate::tui::theme;
use crate::utils::format::volume_bar;

pub fn render(frame: &mut Frame, area: Rect, music: &MusicPlayer) {
    let block = Block::default()
        .title(Span::styled(" Musik ", theme::moon()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let (state_icon, state_style) = if music.is_playing() {
        ("▶", theme::teal())
    } else {
        ("⏸", theme::dim())
    };

    let playlist = music.playlist();
    let position = match playlist.current_index() {
        Some(i) => format!("{}/{}", i + 1, playlist.len()),
        None => format!("-/{}", playlist.len()),
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {} ", state_icon), state_style),
            Span::styled(
                music.track_label().to_string(),
                theme::bold().add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(vec![
            Span::styled("    lagu ", theme::dim()),
            Span::styled(position, theme::dim()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  vol ", theme::dim()),
            Span::styled(volume_bar(music.volume(), 10), theme::teal()),
            Span::styled(
                format!(" {:>3}%", (music.volume() * 100.0).round() as u32),
                theme::dim(),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
