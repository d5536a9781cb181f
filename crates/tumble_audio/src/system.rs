//! Audio output using rodio

use crate::cue::AudioCue;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Audio error types
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Failed to initialize audio device: {0}")]
    DeviceInit(String),

    /// Audio file could not be read
    #[error("Audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Audio data could not be decoded
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// Playback could not be started
    #[error("Playback failed: {0}")]
    Playback(String),
}

/// An open output device.
///
/// The underlying stream stops when this value is dropped, so it must
/// outlive every cue loaded from it.
pub struct AudioOutput {
    /// Output stream (must be kept alive)
    _stream: OutputStream,
    /// Stream handle for creating sinks
    stream_handle: OutputStreamHandle,
}

impl AudioOutput {
    /// Open the default output device
    pub fn open() -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        log::info!("Audio output opened");
        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Load a cue from an audio file
    pub fn load_cue(&self, path: impl AsRef<Path>) -> Result<SampleCue, AudioError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| AudioError::FileNotFound(path.to_path_buf()))?;
        let cue = self.cue_from_bytes(bytes)?;
        log::info!("Loaded sound cue {}", path.display());
        Ok(cue)
    }

    /// Build a cue from encoded audio already in memory
    pub fn cue_from_bytes(&self, bytes: impl Into<Arc<[u8]>>) -> Result<SampleCue, AudioError> {
        let data: Arc<[u8]> = bytes.into();
        // Decode once up front so a bad file is reported at load time.
        Decoder::new(Cursor::new(data.clone())).map_err(|e| AudioError::Decode(e.to_string()))?;

        Ok(SampleCue {
            stream_handle: self.stream_handle.clone(),
            data,
            sink: None,
            volume: 1.0,
            position: 0.0,
        })
    }
}

/// A decoded-on-demand sound backed by an output device
pub struct SampleCue {
    stream_handle: OutputStreamHandle,
    /// Encoded audio data
    data: Arc<[u8]>,
    /// Sink of the playback in progress, if any
    sink: Option<Sink>,
    volume: f32,
    position: f32,
}

impl SampleCue {
    /// Stop playback
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl AudioCue for SampleCue {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn set_playback_position(&mut self, seconds: f32) {
        self.position = seconds.max(0.0);
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.stop();

        let source = Decoder::new(Cursor::new(self.data.clone()))
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::Playback(e.to_string()))?;

        sink.set_volume(self.volume);
        sink.append(source.skip_duration(Duration::from_secs_f32(self.position)));

        self.sink = Some(sink);
        Ok(())
    }
}

impl Drop for SampleCue {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Playback tests require audio hardware and are run manually.

    #[test]
    fn test_audio_error_display() {
        let err = AudioError::FileNotFound(PathBuf::from("sounds/hit.mp3"));
        assert!(err.to_string().contains("sounds/hit.mp3"));

        let err = AudioError::Decode("unsupported format".into());
        assert!(err.to_string().contains("unsupported format"));
    }
}
