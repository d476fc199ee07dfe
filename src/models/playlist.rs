use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: PathBuf,
    pub display_name: String,
}

impl Track {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let source = path.as_ref().to_path_buf();
        let display_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        Self {
            source,
            display_name,
        }
    }
}

/// Append-only list of tracks with an optional current position.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = Some(index);
        self.tracks.get(index)
    }

    pub fn has_next(&self) -> bool {
        matches!(self.current, Some(i) if i + 1 < self.tracks.len())
    }

    pub fn has_prev(&self) -> bool {
        matches!(self.current, Some(i) if i > 0)
    }
}
