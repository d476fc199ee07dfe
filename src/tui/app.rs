use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::audio::backend::AudioOutputs;
use crate::audio::music::tracks_from_path;
use crate::config::AppConfig;
use crate::models::Track;
use crate::prayer_times::{Geolocator, provider_from_config};
use crate::schedule::SystemClock;
use crate::session::presenter::{date_label, next_prayer_view, schedule_rows};
use crate::session::{Session, SessionDeps};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{banner, header, next_prayer, player, prayers, statusbar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    AddTrack,
}

pub struct App {
    pub view: View,
    pub session: Session,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>, // shown in the add-track popup
    hijri_offset: i32,
}

/// Expand each path into tracks, skipping the ones that cannot be read.
pub fn load_tracks(paths: &[PathBuf]) -> Vec<Track> {
    let mut tracks = Vec::new();
    for path in paths {
        match tracks_from_path(path) {
            Ok(found) => tracks.extend(found),
            Err(e) => log::warn!("Skipping {:?}: {}", path, e),
        }
    }
    tracks
}

impl App {
    pub fn new(session: Session, hijri_offset: i32) -> Self {
        App {
            view: View::Dashboard,
            session,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            hijri_offset,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Some terminals also report releases and repeats.
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::AddTrack => self.handle_add_track_input(key),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char(' ') => self.session.music_mut().toggle(),
            KeyCode::Char('n') | KeyCode::Right => self.session.music_mut().next(),
            KeyCode::Char('p') | KeyCode::Left => self.session.music_mut().prev(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.session.music_mut().volume_up()
            }
            KeyCode::Char('-') | KeyCode::Down => self.session.music_mut().volume_down(),
            KeyCode::Char('a') => {
                self.input_mode = InputMode::AddTrack;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Char('r') => self.session.refetch(),
            KeyCode::Char('l') => self.session.refresh_location(),
            KeyCode::Char('x') => self.session.dismiss_notification(),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_add_track_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_input(),
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim();
                if trimmed.is_empty() {
                    self.input_error = Some("Masukkan path file atau folder".to_string());
                    return;
                }
                match tracks_from_path(Path::new(trimmed)) {
                    Ok(tracks) if tracks.is_empty() => {
                        self.input_error = Some("Tidak ada file audio di folder itu".to_string());
                    }
                    Ok(tracks) => {
                        let added = tracks.len();
                        self.session.add_tracks(tracks);
                        self.session.notify(format!("{} lagu ditambahkan", added));
                        self.close_input();
                    }
                    Err(e) => {
                        self.input_error = Some(format!("'{}': {}", trimmed, e));
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn close_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.input_error = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);

        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode == InputMode::AddTrack {
            self.draw_add_track_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let now = self.session.now();
        let note = self.session.banner().current();

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),                                  // header
                Constraint::Length(if note.is_some() { 3 } else { 0 }), // banner
                Constraint::Min(0),                                     // body
                Constraint::Length(1),                                  // status bar
            ])
            .split(area);

        let location = self.session.location();
        header::render(
            frame,
            outer_chunks[0],
            &date_label(&now, self.hijri_offset),
            &location.display(),
            location.source.as_str(),
        );
        if let Some(note) = note {
            banner::render(frame, outer_chunks[1], note);
        }
        statusbar::render(frame, outer_chunks[3]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[2]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // next prayer
                Constraint::Min(0),    // music
            ])
            .split(columns[0]);

        let timings = self.session.timings();
        next_prayer::render(
            frame,
            left_chunks[0],
            &next_prayer_view(self.session.state(), timings, &now),
        );
        player::render(frame, left_chunks[1], self.session.music());
        prayers::render(frame, columns[1], &schedule_rows(timings, &now));
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(14).min(area.height),
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[spasi]     ", "Putar / jeda musik"),
            ("[n] [p]     ", "Lagu berikutnya / sebelumnya"),
            ("[+] [-]     ", "Naikkan / turunkan volume"),
            ("[a]         ", "Tambah lagu atau folder"),
            ("[r]         ", "Ambil ulang jadwal"),
            ("[l]         ", "Perbarui lokasi"),
            ("[x]         ", "Tutup notifikasi"),
            ("[?]         ", "Bantuan"),
            ("[q] / Esc   ", "Keluar"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Tombol",
                theme::moon().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        help_text.extend(bindings.iter().map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!("  {}", key), theme::moon()),
                Span::styled(*label, theme::dim()),
            ])
        }));

        let block = Block::default()
            .title(Span::styled(" Bantuan ", theme::moon()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::moon())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_add_track_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 6,
            y: (area.height / 2).saturating_sub(3),
            width: area.width * 2 / 3,
            height: height.min(area.height),
        };

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Path: ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::moon().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::teal()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  File atau folder audio, lalu [Enter]  ·  [Esc] batal",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::teal()
        };

        let block = Block::default()
            .title(Span::styled(" Tambah Lagu ", theme::moon()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the dashboard until the user quits.
pub async fn run(config: AppConfig, extra_tracks: Vec<PathBuf>) -> Result<()> {
    let (tx, mut session_rx) = mpsc::unbounded_channel();
    let deps = SessionDeps {
        clock: Arc::new(SystemClock),
        provider: provider_from_config(&config.provider)?,
        geolocator: Arc::new(Geolocator::from_config(&config.location)),
        audio: AudioOutputs::open(
            AppConfig::sound_path(&config.alerts.alarm_sound),
            AppConfig::sound_path(&config.alerts.adhan_sound),
        ),
    };
    let mut app = App::new(Session::new(&config, deps, tx), config.display.hijri_offset);

    let paths: Vec<PathBuf> = config.music.tracks.iter().cloned().chain(extra_tracks).collect();
    app.session.add_tracks(load_tracks(&paths));
    app.session.refresh_location();

    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(Duration::from_millis(250));
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        tokio::select! {
            Some(event) = events.next() => match event {
                Event::Key(key) => {
                    app.handle_key(key);
                    if app.should_quit {
                        break Ok(());
                    }
                }
                Event::Resize => {}
            },
            Some(event) = session_rx.recv() => app.session.handle(event),
            _ = tick.tick() => app.session.tick(),
        }
    };

    app.session.teardown();
    ratatui::restore();
    result
}
