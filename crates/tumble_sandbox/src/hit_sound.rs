//! Collision sound hook
//!
//! One [`HitSound`] is shared by every spawned body. Each body gets its own
//! [`HitSoundHook`] subscription pointing at it, so toggling sound or
//! swapping the cue affects all bodies at once.

use parking_lot::Mutex;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tumble_audio::AudioCue;
use tumble_physics::{CollisionEvent, PhysicsEventHandler};

/// Impact speed (m/s) a collision must exceed to be heard
pub const DEFAULT_IMPACT_THRESHOLD: f32 = 1.5;

/// Shared hit-sound state
pub struct HitSound {
    enabled: AtomicBool,
    threshold: f32,
    cue: Mutex<Box<dyn AudioCue>>,
    rng: Mutex<ChaCha8Rng>,
    plays: AtomicU64,
}

impl HitSound {
    pub fn new(cue: Box<dyn AudioCue>, enabled: bool, threshold: f32, rng: ChaCha8Rng) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            threshold,
            cue: Mutex::new(cue),
            rng: Mutex::new(rng),
            plays: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        log::info!("Hit sound {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Flip the switch and return the new state
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::Relaxed);
        log::info!("Hit sound {}", if enabled { "enabled" } else { "disabled" });
        enabled
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Number of cues started successfully
    pub fn play_count(&self) -> u64 {
        self.plays.load(Ordering::Relaxed)
    }

    /// Replace the cue, returning the previous one
    pub fn replace_cue(&self, cue: Box<dyn AudioCue>) -> Box<dyn AudioCue> {
        std::mem::replace(&mut *self.cue.lock(), cue)
    }

    /// React to one collision event
    pub fn handle(&self, event: &CollisionEvent) {
        if !event.is_started() || !self.is_enabled() {
            return;
        }
        if event.impact_velocity <= self.threshold {
            return;
        }

        let volume: f32 = self.rng.lock().gen();
        let mut cue = self.cue.lock();
        cue.set_volume(volume);
        cue.set_playback_position(0.0);
        match cue.play() {
            Ok(()) => {
                self.plays.fetch_add(1, Ordering::Relaxed);
                log::debug!(
                    "Hit sound at {:.2} m/s near {:?}, volume {:.2}",
                    event.impact_velocity,
                    event.average_contact_point(),
                    volume
                );
            }
            Err(e) => log::debug!("Hit sound playback failed: {}", e),
        }
    }

    /// Handler to subscribe for one body
    pub fn hook(self: &Arc<Self>) -> HitSoundHook {
        HitSoundHook(Arc::clone(self))
    }
}

/// Per-body subscription forwarding to the shared [`HitSound`]
pub struct HitSoundHook(Arc<HitSound>);

impl PhysicsEventHandler for HitSoundHook {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.0.handle(event);
    }
}
