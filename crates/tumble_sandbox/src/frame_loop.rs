//! Frame loop
//!
//! Each frame: apply pending control commands, step the physics world by
//! the wall-clock delta, copy body poses onto meshes, update the orbit
//! controls and render. The loop ends on cancellation, a `quit` command or
//! the configured frame cap.

use crate::config::SandboxConfig;
use crate::control::{self, ControlCommand};
use crate::error::Result;
use crate::session::Session;
use crossbeam_channel::{Receiver, TryRecvError};
use glam::Vec3;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tumble_render::{FrameStats, OrbitControls, PerspectiveCamera, Renderer, Viewport};

/// Shared stop flag
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Timing of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Seconds since the first frame
    pub elapsed: f32,
    /// Seconds since the previous frame; zero on the first frame
    pub delta: f32,
}

/// Wall clock producing per-frame deltas
#[derive(Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a frame
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Mark the start of a frame at `now`
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        self.frame += 1;

        FrameTime {
            frame: self.frame,
            elapsed: now.saturating_duration_since(start).as_secs_f32(),
            delta,
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Cancelled,
    Quit,
    FrameLimit,
}

/// What one frame did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// Internal physics steps taken
    pub substeps: u32,
    pub render: FrameStats,
}

/// Drives a session frame by frame
pub struct FrameLoop<R: Renderer> {
    session: Session,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    renderer: R,
    viewport: Viewport,
    clock: FrameClock,
    commands: Option<Receiver<ControlCommand>>,
    token: CancellationToken,
    max_frames: Option<u64>,
    target_fps: u32,
    frames: u64,
}

impl<R: Renderer> FrameLoop<R> {
    pub fn new(
        session: Session,
        camera: PerspectiveCamera,
        controls: OrbitControls,
        renderer: R,
        viewport: Viewport,
    ) -> Self {
        let mut frame_loop = Self {
            session,
            camera,
            controls,
            renderer,
            viewport,
            clock: FrameClock::new(),
            commands: None,
            token: CancellationToken::new(),
            max_frames: None,
            target_fps: 0,
            frames: 0,
        };
        frame_loop.resize(viewport.width, viewport.height, viewport.device_pixel_ratio);
        frame_loop
    }

    /// Build camera, controls and viewport from `config`
    pub fn from_config(session: Session, config: &SandboxConfig, renderer: R) -> Self {
        let display = &config.display;
        let viewport = Viewport::new(display.width, display.height, display.device_pixel_ratio);

        let camera_config = &config.camera;
        let mut camera = PerspectiveCamera::new(
            camera_config.fov,
            viewport.aspect(),
            camera_config.near,
            camera_config.far,
        )
        .with_position(Vec3::from_array(camera_config.position));
        camera.look_at(Vec3::ZERO, Vec3::Y);

        let mut controls = OrbitControls::new(&camera, Vec3::ZERO);
        if camera_config.damping > 0.0 {
            controls = controls.with_damping(camera_config.damping);
        }

        let mut frame_loop = Self::new(session, camera, controls, renderer, viewport);
        frame_loop.max_frames = display.max_frames;
        frame_loop.target_fps = display.target_fps;
        frame_loop
    }

    /// Receive control commands from `commands`
    pub fn with_commands(mut self, commands: Receiver<ControlCommand>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Stop when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Stop after `frames` frames
    pub fn with_max_frames(mut self, frames: Option<u64>) -> Self {
        self.max_frames = frames;
        self
    }

    /// Pace frames to `fps`; 0 runs unpaced
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Update camera aspect, viewport and renderer for a new surface size
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        self.viewport = Viewport::new(width, height, device_pixel_ratio);
        self.camera.set_aspect(self.viewport.aspect());
        self.renderer.resize(self.viewport);
    }

    /// Run one frame with an explicit delta
    pub fn advance(&mut self, delta: f32) -> Result<FrameReport> {
        let substeps = self.session.step(delta);
        self.session.sync()?;
        self.controls.update(&mut self.camera);
        let render = self.renderer.render(self.session.scene(), &self.camera)?;
        self.frames += 1;
        Ok(FrameReport { substeps, render })
    }

    /// Apply pending commands, then run one frame on the wall clock.
    ///
    /// Returns `Some` when the loop should stop.
    pub fn tick(&mut self) -> Result<Option<LoopExit>> {
        if self.drain_commands()? {
            return Ok(Some(LoopExit::Quit));
        }

        let time = self.clock.tick();
        let report = self.advance(time.delta)?;

        if time.frame % 300 == 1 {
            log::info!(
                "Frame {}: {} objects, {} awake, {} substeps, {:.1}s",
                time.frame,
                self.session.registry().len(),
                self.session.physics().active_body_count(),
                report.substeps,
                time.elapsed
            );
        }
        Ok(None)
    }

    /// Run until cancelled, quit or out of frames
    pub fn run(&mut self) -> Result<LoopExit> {
        let frame_time = (self.target_fps > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(self.target_fps)));
        log::info!("Frame loop started");

        let exit = loop {
            if self.token.is_cancelled() {
                break LoopExit::Cancelled;
            }
            if self.max_frames.is_some_and(|max| self.frames >= max) {
                break LoopExit::FrameLimit;
            }

            let started = Instant::now();
            if let Some(exit) = self.tick()? {
                break exit;
            }

            if let Some(frame_time) = frame_time {
                let elapsed = started.elapsed();
                if elapsed < frame_time {
                    std::thread::sleep(frame_time - elapsed);
                }
            }
        };

        log::info!("Frame loop stopped after {} frames ({:?})", self.frames, exit);
        Ok(exit)
    }

    /// Apply queued commands. Returns true on quit.
    fn drain_commands(&mut self) -> Result<bool> {
        let Some(commands) = &self.commands else {
            return Ok(false);
        };

        let mut pending = Vec::new();
        let mut disconnected = false;
        loop {
            match commands.try_recv() {
                Ok(command) => pending.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            log::debug!("Control input closed");
            self.commands = None;
        }

        for command in pending {
            let outcome = control::execute(&mut self.session, command)?;
            for line in &outcome.lines {
                log::info!("{}", line);
            }
            if outcome.quit {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
