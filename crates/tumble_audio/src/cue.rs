//! The cue abstraction and the output-free cue implementations

use crate::system::AudioError;
use parking_lot::Mutex;
use std::sync::Arc;

/// A preloaded sound that can be rewound and restarted.
///
/// Volume and position are staged with the setters and take effect on the
/// next `play`.
pub trait AudioCue: Send {
    /// Set the volume used by the next `play` (clamped to 0..=1)
    fn set_volume(&mut self, volume: f32);

    /// Set the position, in seconds, the next `play` starts from
    fn set_playback_position(&mut self, seconds: f32);

    /// Start the cue, cutting off any playback still in progress
    fn play(&mut self) -> Result<(), AudioError>;
}

/// One recorded `play` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuePlayback {
    pub volume: f32,
    pub position: f32,
}

/// Cue that accepts every call and produces no sound.
///
/// Used when no output device is available or the cue could not be loaded.
#[derive(Debug, Default)]
pub struct MutedCue {
    volume: f32,
    position: f32,
    plays: u64,
}

impl MutedCue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `play` was called
    pub fn play_count(&self) -> u64 {
        self.plays
    }

    /// Volume staged for the next play
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Position staged for the next play
    pub fn position(&self) -> f32 {
        self.position
    }
}

impl AudioCue for MutedCue {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn set_playback_position(&mut self, seconds: f32) {
        self.position = seconds.max(0.0);
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.plays += 1;
        log::trace!("Muted cue played at volume {:.2}", self.volume);
        Ok(())
    }
}

/// Shared view of the plays made through a [`RecordingCue`]
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    plays: Arc<Mutex<Vec<CuePlayback>>>,
}

impl CueLog {
    /// All plays so far, oldest first
    pub fn plays(&self) -> Vec<CuePlayback> {
        self.plays.lock().clone()
    }

    /// Number of plays so far
    pub fn len(&self) -> usize {
        self.plays.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded plays
    pub fn clear(&self) {
        self.plays.lock().clear();
    }
}

/// Silent cue that records every play into a [`CueLog`]
#[derive(Debug)]
pub struct RecordingCue {
    volume: f32,
    position: f32,
    log: CueLog,
}

impl RecordingCue {
    /// Create a cue together with the log it writes to
    pub fn new() -> (Self, CueLog) {
        let log = CueLog::default();
        let cue = Self {
            volume: 1.0,
            position: 0.0,
            log: log.clone(),
        };
        (cue, log)
    }
}

impl AudioCue for RecordingCue {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn set_playback_position(&mut self, seconds: f32) {
        self.position = seconds.max(0.0);
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.log.plays.lock().push(CuePlayback {
            volume: self.volume,
            position: self.position,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_cue_counts_plays() {
        let mut cue = MutedCue::new();
        cue.set_volume(2.0);
        cue.play().unwrap();
        cue.play().unwrap();
        assert_eq!(cue.play_count(), 2);
        assert_eq!(cue.volume(), 1.0);
    }

    #[test]
    fn test_recording_cue_captures_staged_values() {
        let (mut cue, log) = RecordingCue::new();
        cue.set_volume(0.25);
        cue.set_playback_position(-1.0);
        cue.play().unwrap();

        assert_eq!(
            log.plays(),
            vec![CuePlayback {
                volume: 0.25,
                position: 0.0
            }]
        );

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_cues_are_object_safe() {
        let (recording, log) = RecordingCue::new();
        let mut cues: Vec<Box<dyn AudioCue>> = vec![Box::new(MutedCue::new()), Box::new(recording)];
        for cue in &mut cues {
            cue.play().unwrap();
        }
        assert_eq!(log.len(), 1);
    }
}
