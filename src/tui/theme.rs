use ratatui::style::{Color, Modifier, Style};

// Night sky: deep indigo ground, moonlight accents.
pub const BG: Color = Color::Rgb(12, 14, 26);
pub const SURFACE: Color = Color::Rgb(20, 24, 40);
pub const BORDER: Color = Color::Rgb(46, 54, 84);
pub const TEXT: Color = Color::Rgb(218, 222, 236);
pub const TEXT_DIM: Color = Color::Rgb(112, 120, 150);
pub const MOON: Color = Color::Rgb(232, 208, 140);
pub const TEAL: Color = Color::Rgb(86, 182, 170);
pub const AMBER: Color = Color::Rgb(222, 150, 72);
pub const RED: Color = Color::Rgb(200, 90, 84);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn moon() -> Style {
    Style::default().fg(MOON)
}

pub fn teal() -> Style {
    Style::default().fg(TEAL)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}
