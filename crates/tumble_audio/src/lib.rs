//! Tumble Audio - sound cues
//!
//! A cue is a single preloaded sound that can be rewound, given a volume and
//! started again. Starting a cue that is still playing restarts it from the
//! requested position; cues never overlap with themselves.
//!
//! # Example
//!
//! ```ignore
//! use tumble_audio::prelude::*;
//!
//! let output = AudioOutput::open()?;
//! let mut hit = output.load_cue("assets/sounds/hit.mp3")?;
//!
//! hit.set_volume(0.4);
//! hit.set_playback_position(0.0);
//! hit.play()?;
//! ```

pub mod cue;
pub mod system;

pub mod prelude {
    pub use crate::cue::{AudioCue, CueLog, CuePlayback, MutedCue, RecordingCue};
    pub use crate::system::{AudioError, AudioOutput, SampleCue};
}

pub use prelude::*;
