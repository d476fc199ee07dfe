//! Music playback and alert cues.

pub mod backend;
pub mod ducking;
pub mod music;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use ducking::{AudioDuckState, DuckController, DuckKind, DuckToken};
pub use music::MusicPlayer;

pub const MAX_VOLUME: f32 = 1.0;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to initialize audio output: {0}")]
    Stream(String),
    #[error("Failed to play audio: {0}")]
    Play(String),
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {0:?}")]
    Decode(PathBuf),
    #[error("Audio output is not available")]
    Unavailable,
}

/// The music stream as seen by the ducking controller.
pub trait MusicStream {
    fn is_playing(&self) -> bool;
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Low-level single-track output used by [`MusicPlayer`].
pub trait PlaybackBackend {
    /// Replace whatever is loaded with `source` and start playing it.
    fn load(&mut self, source: &Path, volume: f32) -> Result<(), AudioError>;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn is_loaded(&self) -> bool;
    /// The loaded track played to its end.
    fn is_finished(&self) -> bool;
}

/// Fixed alert assets played over a paused music stream.
pub trait CuePlayer {
    /// Play `kind`'s asset from the start at full volume, cutting off any cue
    /// already playing.
    fn play(&mut self, kind: DuckKind, token: DuckToken) -> Result<(), AudioError>;
    /// Token of the cue that just played to its end, reported once. A cue that
    /// was cut off or stopped is never reported.
    fn poll_ended(&mut self) -> Option<DuckToken>;
    fn stop(&mut self);
}
