use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::prayer_times::{Geolocator, provider_from_config};
use crate::session::ScheduleState;
use crate::session::presenter::{NextPrayerView, date_label, next_prayer_view, schedule_rows};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const MOON: &str = "\x1b[38;2;232;208;140m";

// ─── Times ───────────────────────────────────────────────────────────────────

pub async fn handle_times(config: &AppConfig) -> Result<()> {
    let provider = provider_from_config(&config.provider)?;
    let location = Geolocator::from_config(&config.location).resolve().await;
    let now = Local::now();

    let timings = provider
        .fetch(now.date_naive(), &location)
        .await
        .with_context(|| format!("Fetching prayer times from {}", provider.name()))?;

    println!();
    println_colored!(MOON, "  Jadwal Sholat — {}", location.display());
    println_colored!(DIM, "  {}", date_label(&now, config.display.hijri_offset));
    println!();

    for row in schedule_rows(Some(&timings), &now) {
        let time = row.time.as_deref().unwrap_or("--:--");
        if row.is_next {
            println_colored!(AMBER, "▶ {:<9} {}", row.prayer.label(), time);
        } else if row.passed {
            println_colored!(DIM, "  {:<9} {}", row.prayer.label(), time);
        } else {
            println_colored!(BOLD, "  {:<9} {}", row.prayer.label(), time);
        }
    }

    if let NextPrayerView::Upcoming {
        prayer,
        time,
        countdown,
    } = next_prayer_view(ScheduleState::Ready, Some(&timings), &now)
    {
        println!();
        println_colored!(
            AMBER,
            "  Berikutnya: {} {} (dalam {})",
            prayer.label(),
            time,
            countdown
        );
    }
    println!();
    Ok(())
}

// ─── Locate ──────────────────────────────────────────────────────────────────

pub async fn handle_locate(config: &AppConfig) -> Result<()> {
    let location = Geolocator::from_config(&config.location).resolve().await;

    println!();
    println_colored!(MOON, "  {}", location.display());
    println!("  {:.4}, {:.4}", location.lat, location.lon);
    println_colored!(DIM, "  via {}", location.source.as_str());
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Write the defaults to `path`. Returns false when a file is already there.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    AppConfig::default().save(path)?;
    Ok(true)
}

pub fn handle_config(path: Option<&Path>, init: bool) -> Result<()> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => AppConfig::config_path()?,
    };

    if init {
        if write_default_config(&path)? {
            println_colored!(MOON, "  Wrote default config to {}", path.display());
        } else {
            println!("  {} already exists, leaving it untouched.", path.display());
        }
        return Ok(());
    }

    let config = AppConfig::load(Some(&path))?;
    let rendered = toml::to_string_pretty(&config).context("Serializing config")?;
    println_colored!(DIM, "# {}", path.display());
    if !path.exists() {
        println_colored!(DIM, "# (file not found, showing defaults)");
    }
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adzan").join("config.toml");

        assert!(write_default_config(&path).unwrap());
        std::fs::write(&path, "[retry]\nmax_retries = 1\n").unwrap();
        assert!(!write_default_config(&path).unwrap());

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.retry.max_retries, 1);
    }
}
