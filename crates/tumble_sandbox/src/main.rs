//! Tumble sandbox
//!
//! Drops primitives onto a floor and lets them tumble. Type commands on
//! stdin (`sphere`, `box`, `cylinder`, `reset`, `sound`, `status`, `help`,
//! `quit`) while it runs.
//!
//! Run with: cargo run -p tumble_sandbox
//!       or: TUMBLE_SOUND=on TUMBLE_FRAMES=600 cargo run --bin tumble

use std::io::BufRead;
use std::process::ExitCode;
use tumble_audio::{AudioCue, AudioOutput, MutedCue};
use tumble_render::{HeadlessRenderer, Viewport};
use tumble_sandbox::config::SandboxConfig;
use tumble_sandbox::control::ControlCommand;
use tumble_sandbox::frame_loop::{CancellationToken, FrameLoop};
use tumble_sandbox::session::Session;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SandboxConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // The output device must outlive the cue loaded from it.
    let output = match AudioOutput::open() {
        Ok(output) => Some(output),
        Err(e) => {
            log::warn!("{}; running without sound", e);
            None
        }
    };
    let cue: Box<dyn AudioCue> = match output.as_ref().map(|o| o.load_cue(&config.sound.clip)) {
        Some(Ok(cue)) => Box::new(cue),
        Some(Err(e)) => {
            log::warn!("{}; hit sound muted", e);
            Box::new(MutedCue::new())
        }
        None => Box::new(MutedCue::new()),
    };

    let mut session = Session::initialize(&config, cue);
    if let Err(e) = session.spawn_initial_objects(&config.initial_objects) {
        log::error!("Failed to spawn initial objects: {}", e);
        return ExitCode::FAILURE;
    }

    // Install signal handler for graceful shutdown
    let token = CancellationToken::new();
    let t = token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        t.cancel();
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let (sender, receiver) = crossbeam_channel::unbounded();
    let spawned = std::thread::Builder::new()
        .name("control-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ControlCommand>() {
                    Ok(command) => {
                        if sender.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("Control input unavailable: {}", e);
    }

    let display = &config.display;
    let viewport = Viewport::new(display.width, display.height, display.device_pixel_ratio);
    let renderer = HeadlessRenderer::new(viewport);
    let mut frame_loop = FrameLoop::from_config(session, &config, renderer)
        .with_commands(receiver)
        .with_cancellation(token);

    log::info!("Type 'help' for commands, Ctrl+C to exit");

    match frame_loop.run() {
        Ok(exit) => {
            log::info!("Exited: {:?}", exit);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Frame loop failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
