use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::prayer_times::calculator::{CALC_METHODS, MADHABS};

fn default_location_name() -> String {
    "Jakarta".to_string()
}
fn default_ip_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}
fn default_lookup_timeout_secs() -> u64 {
    10
}
fn default_cache_secs() -> u64 {
    60
}
fn default_source() -> String {
    "aladhan".to_string()
}
fn default_base_url() -> String {
    "https://api.aladhan.com/v1".to_string()
}
fn default_method() -> u8 {
    2
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_calc_method() -> String {
    "NorthAmerica".to_string()
}
fn default_madhab() -> String {
    "Shafi".to_string()
}
fn default_pre_alarm_minutes() -> u32 {
    10
}
fn default_alarm_sound() -> PathBuf {
    PathBuf::from("sound/alarm.mp3")
}
fn default_adhan_sound() -> PathBuf {
    PathBuf::from("sound/adzan.mp3")
}
fn default_base_delay_ms() -> u64 {
    5000
}
fn default_max_retries() -> u32 {
    3
}
fn default_volume() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}

pub const PROVIDER_SOURCES: &[&str] = &["aladhan", "offline"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Fixed device coordinates. When both are set they win over IP lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default = "default_location_name")]
    pub name: String,
    #[serde(default = "default_true")]
    pub ip_lookup: bool,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
    /// How long a resolved location is reused before asking again.
    #[serde(default = "default_cache_secs")]
    pub cache_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            name: default_location_name(),
            ip_lookup: true,
            ip_lookup_url: default_ip_lookup_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
            cache_secs: default_cache_secs(),
        }
    }
}

impl LocationConfig {
    pub fn device_coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// "aladhan" (remote API) or "offline" (local calculation).
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Aladhan calculation method id.
    #[serde(default = "default_method")]
    pub method: u8,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_calc_method")]
    pub calc_method: String,
    #[serde(default = "default_madhab")]
    pub madhab: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            base_url: default_base_url(),
            method: default_method(),
            timeout_secs: default_timeout_secs(),
            calc_method: default_calc_method(),
            madhab: default_madhab(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_pre_alarm_minutes")]
    pub pre_alarm_minutes: u32,
    /// Relative paths resolve against the data directory.
    #[serde(default = "default_alarm_sound")]
    pub alarm_sound: PathBuf,
    #[serde(default = "default_adhan_sound")]
    pub adhan_sound: PathBuf,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            pre_alarm_minutes: default_pre_alarm_minutes(),
            alarm_sound: default_alarm_sound(),
            adhan_sound: default_adhan_sound(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_retries: default_max_retries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    #[serde(default)]
    pub tracks: Vec<PathBuf>,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            tracks: vec![],
            volume: default_volume(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    /// Days to add/subtract from the Hijri date for local moon sighting.
    #[serde(default)]
    pub hijri_offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub music: MusicConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "adzan").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("adzan.log"))
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Load from `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                bail!("location.latitude out of range: {}", lat);
            }
        }
        if let Some(lon) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                bail!("location.longitude out of range: {}", lon);
            }
        }
        if !PROVIDER_SOURCES.contains(&self.provider.source.as_str()) {
            bail!(
                "Unknown provider.source '{}' (expected one of: {})",
                self.provider.source,
                PROVIDER_SOURCES.join(", ")
            );
        }
        if self.provider.source == "offline" {
            if !CALC_METHODS.contains(&self.provider.calc_method.as_str()) {
                bail!("Unknown provider.calc_method '{}'", self.provider.calc_method);
            }
            if !MADHABS.contains(&self.provider.madhab.as_str()) {
                bail!("Unknown provider.madhab '{}'", self.provider.madhab);
            }
        }
        if !(0.0..=1.0).contains(&self.music.volume) {
            bail!("music.volume must be within 0.0..=1.0, got {}", self.music.volume);
        }
        Ok(())
    }

    /// Resolve a configured sound path against the data directory.
    pub fn sound_path(path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match Self::data_dir() {
            Ok(dir) => dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.retry.base_delay_ms, 5000);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.alerts.pre_alarm_minutes, 10);
        assert_eq!(config.provider.method, 2);
        assert!(config.location.device_coordinates().is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[location]\nlatitude = -7.25\nlongitude = 112.75\nname = \"Surabaya\"\n\n[retry]\nmax_retries = 5\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.location.device_coordinates(), Some((-7.25, 112.75)));
        assert_eq!(config.location.name, "Surabaya");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, 5000);
        assert_eq!(config.provider.source, "aladhan");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.music.volume = 0.4;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert!((loaded.music.volume - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = AppConfig::default();
        config.location.latitude = Some(123.0);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.provider.source = "carrier-pigeon".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.provider.source = "offline".to_string();
        config.provider.madhab = "Unknown".to_string();
        assert!(config.validate().is_err());
    }
}
