//! Concrete audio outputs. With the `playback` feature this is rodio; without
//! it, or when no output device opens, the null outputs log instead.

use std::path::{Path, PathBuf};

use crate::audio::{AudioError, CuePlayer, DuckKind, DuckToken, PlaybackBackend};

/// Everything the session needs to make sound. `_keepalive` owns the output
/// device and must outlive the players.
pub struct AudioOutputs {
    pub music: Box<dyn PlaybackBackend>,
    pub cues: Box<dyn CuePlayer>,
    _keepalive: Option<Box<dyn std::any::Any>>,
}

impl AudioOutputs {
    pub fn null() -> Self {
        Self {
            music: Box::new(NullMusic::default()),
            cues: Box::new(NullCues),
            _keepalive: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(music: Box<dyn PlaybackBackend>, cues: Box<dyn CuePlayer>) -> Self {
        Self {
            music,
            cues,
            _keepalive: None,
        }
    }

    #[cfg(feature = "playback")]
    pub fn open(alarm: PathBuf, adhan: PathBuf) -> Self {
        match rodio_output::RodioOutput::new() {
            Ok(output) => {
                let music = rodio_output::RodioMusic::new(output.handle());
                let cues = rodio_output::RodioCues::new(output.handle(), alarm, adhan);
                Self {
                    music: Box::new(music),
                    cues: Box::new(cues),
                    _keepalive: Some(Box::new(output)),
                }
            }
            Err(e) => {
                log::warn!("{}; continuing without sound", e);
                Self::null()
            }
        }
    }

    #[cfg(not(feature = "playback"))]
    pub fn open(alarm: PathBuf, adhan: PathBuf) -> Self {
        log::info!(
            "Built without playback; cues {:?} and {:?} will not sound",
            alarm,
            adhan
        );
        Self::null()
    }
}

/// Pretends to play forever.
#[derive(Default)]
pub struct NullMusic {
    loaded: Option<PathBuf>,
}

impl PlaybackBackend for NullMusic {
    fn load(&mut self, source: &Path, _volume: f32) -> Result<(), AudioError> {
        log::debug!("(silent) loading {:?}", source);
        self.loaded = Some(source.to_path_buf());
        Ok(())
    }
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
    fn pause(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }
    fn is_finished(&self) -> bool {
        false
    }
}

/// Cues always fail, so ducks complete immediately.
pub struct NullCues;

impl CuePlayer for NullCues {
    fn play(&mut self, _kind: DuckKind, _token: DuckToken) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
    fn poll_ended(&mut self) -> Option<DuckToken> {
        None
    }
    fn stop(&mut self) {}
}

#[cfg(feature = "playback")]
mod rodio_output {
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};

    use crate::audio::{AudioError, CuePlayer, DuckKind, DuckToken, MAX_VOLUME, PlaybackBackend};

    pub struct RodioOutput {
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl RodioOutput {
        pub fn new() -> Result<Self, AudioError> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| AudioError::Stream(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }

        pub fn handle(&self) -> OutputStreamHandle {
            self.handle.clone()
        }
    }

    fn open_sink(
        handle: &OutputStreamHandle,
        path: &Path,
        volume: f32,
    ) -> Result<Sink, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|_| AudioError::Decode(path.to_path_buf()))?;
        let sink = Sink::try_new(handle).map_err(|e| AudioError::Play(e.to_string()))?;
        sink.set_volume(volume);
        sink.append(source);
        Ok(sink)
    }

    pub struct RodioMusic {
        handle: OutputStreamHandle,
        sink: Option<Sink>,
    }

    impl RodioMusic {
        pub fn new(handle: OutputStreamHandle) -> Self {
            Self { handle, sink: None }
        }
    }

    impl PlaybackBackend for RodioMusic {
        fn load(&mut self, source: &Path, volume: f32) -> Result<(), AudioError> {
            if let Some(old) = self.sink.take() {
                old.stop();
            }
            let sink = open_sink(&self.handle, source, volume)?;
            sink.play();
            self.sink = Some(sink);
            Ok(())
        }

        fn play(&mut self) -> Result<(), AudioError> {
            match &self.sink {
                Some(sink) => {
                    sink.play();
                    Ok(())
                }
                None => Err(AudioError::Play("nothing loaded".into())),
            }
        }

        fn pause(&mut self) {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
        }

        fn set_volume(&mut self, volume: f32) {
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }

        fn is_loaded(&self) -> bool {
            self.sink.is_some()
        }

        fn is_finished(&self) -> bool {
            self.sink.as_ref().is_some_and(|s| s.empty())
        }
    }

    pub struct RodioCues {
        handle: OutputStreamHandle,
        alarm: PathBuf,
        adhan: PathBuf,
        current: Option<(DuckToken, Sink)>,
    }

    impl RodioCues {
        pub fn new(handle: OutputStreamHandle, alarm: PathBuf, adhan: PathBuf) -> Self {
            Self {
                handle,
                alarm,
                adhan,
                current: None,
            }
        }
    }

    impl CuePlayer for RodioCues {
        fn play(&mut self, kind: DuckKind, token: DuckToken) -> Result<(), AudioError> {
            self.stop();
            let path = match kind {
                DuckKind::PreAlarm => &self.alarm,
                DuckKind::Adhan => &self.adhan,
            };
            let sink = open_sink(&self.handle, path, MAX_VOLUME)?;
            sink.play();
            self.current = Some((token, sink));
            Ok(())
        }

        fn poll_ended(&mut self) -> Option<DuckToken> {
            let ended = matches!(&self.current, Some((_, sink)) if sink.empty());
            if ended {
                return self.current.take().map(|(token, _)| token);
            }
            None
        }

        fn stop(&mut self) {
            if let Some((_, sink)) = self.current.take() {
                sink.stop();
            }
        }
    }
}
