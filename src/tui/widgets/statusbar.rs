use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

const HINTS: &[(&str, &str)] = &[
    ("[spasi]", " putar/jeda  "),
    ("[n/p]", " lagu  "),
    ("[+/-]", " volume  "),
    ("[a]", " tambah  "),
    ("[r]", " muat ulang  "),
    ("[l]", " lokasi  "),
    ("[?]", " bantuan  "),
    ("[q]", " keluar"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let spans: Vec<Span> = HINTS
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, theme::moon()),
                Span::styled(*label, theme::dim()),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
