//! Control panel commands
//!
//! Text commands the user types to drive the sandbox. Parsing happens on
//! the input thread; execution happens on the frame-loop thread between
//! frames.

use crate::error::{Result, SandboxError};
use crate::session::Session;
use crate::shapes::ShapeKind;
use std::str::FromStr;

/// Sound switch positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSwitch {
    On,
    Off,
    Toggle,
}

/// A control panel action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Spawn a random object of this kind
    Spawn(ShapeKind),
    /// Remove every spawned object
    Reset,
    Sound(SoundSwitch),
    Status,
    Help,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or("");
        let arg = words.next();

        let command = match (head, arg) {
            ("reset" | "clear", None) => Self::Reset,
            ("sound", None | Some("toggle")) => Self::Sound(SoundSwitch::Toggle),
            ("sound", Some("on")) => Self::Sound(SoundSwitch::On),
            ("sound", Some("off")) => Self::Sound(SoundSwitch::Off),
            ("status", None) => Self::Status,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            (shape, None) => match shape.parse() {
                Ok(kind) => Self::Spawn(kind),
                Err(_) => return Err(SandboxError::UnknownCommand(s.trim().to_string())),
            },
            _ => return Err(SandboxError::UnknownCommand(s.trim().to_string())),
        };

        if words.next().is_some() {
            return Err(SandboxError::UnknownCommand(s.trim().to_string()));
        }
        Ok(command)
    }
}

/// Result of running one command
#[derive(Debug, Default)]
pub struct ControlOutcome {
    /// Lines to show the user
    pub lines: Vec<String>,
    /// The loop should stop
    pub quit: bool,
}

impl ControlOutcome {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }
}

/// Run a command against the session
pub fn execute(session: &mut Session, command: ControlCommand) -> Result<ControlOutcome> {
    let outcome = match command {
        ControlCommand::Spawn(kind) => {
            let record = session.create_random(kind)?;
            let pose = session.physics().get_body_pose(record.body)?;
            ControlOutcome::lines(vec![format!(
                "Spawned {} at ({:.2}, {:.2}, {:.2})",
                kind, pose.position[0], pose.position[1], pose.position[2]
            )])
        }
        ControlCommand::Reset => {
            let removed = session.reset();
            ControlOutcome::lines(vec![format!("Removed {} objects", removed)])
        }
        ControlCommand::Sound(switch) => {
            let enabled = match switch {
                SoundSwitch::On => {
                    session.set_sound_enabled(true);
                    true
                }
                SoundSwitch::Off => {
                    session.set_sound_enabled(false);
                    false
                }
                SoundSwitch::Toggle => session.toggle_sound(),
            };
            ControlOutcome::lines(vec![format!("Sound {}", if enabled { "on" } else { "off" })])
        }
        ControlCommand::Status => {
            let registry = session.registry();
            let physics = session.physics();
            ControlOutcome::lines(vec![
                format!(
                    "Objects: {} ({} spheres, {} boxes, {} cylinders)",
                    registry.len(),
                    registry.count_of(ShapeKind::Sphere),
                    registry.count_of(ShapeKind::Box),
                    registry.count_of(ShapeKind::Cylinder)
                ),
                format!(
                    "Bodies: {} ({} dynamic, {} awake)",
                    physics.body_count(),
                    physics.dynamic_body_count(),
                    physics.active_body_count()
                ),
                format!("Simulated: {:.1}s", physics.time()),
                format!(
                    "Sound: {} ({} hits played)",
                    if session.sound_enabled() { "on" } else { "off" },
                    session.hit_sound().play_count()
                ),
            ])
        }
        ControlCommand::Help => ControlOutcome::lines(
            [
                "Available commands:",
                "  sphere    - Drop a random sphere",
                "  box       - Drop a random box",
                "  cylinder  - Drop a random cylinder",
                "  reset     - Remove all objects",
                "  sound [on|off|toggle]",
                "  status    - Show session status",
                "  quit      - Exit",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ),
        ControlCommand::Quit => ControlOutcome {
            lines: vec!["Shutting down".to_string()],
            quit: true,
        },
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SandboxConfig;
    use tumble_audio::MutedCue;

    #[test]
    fn test_parse_commands() {
        let parse = |s: &str| s.parse::<ControlCommand>().unwrap();
        assert_eq!(parse("sphere"), ControlCommand::Spawn(ShapeKind::Sphere));
        assert_eq!(parse(" Box "), ControlCommand::Spawn(ShapeKind::Box));
        assert_eq!(parse("sound"), ControlCommand::Sound(SoundSwitch::Toggle));
        assert_eq!(parse("sound off"), ControlCommand::Sound(SoundSwitch::Off));
        assert_eq!(parse("exit"), ControlCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            "teleport".parse::<ControlCommand>(),
            Err(SandboxError::UnknownCommand(_))
        ));
        assert!("sound loud".parse::<ControlCommand>().is_err());
        assert!("reset now".parse::<ControlCommand>().is_err());
        assert!("".parse::<ControlCommand>().is_err());
    }

    #[test]
    fn test_execute_spawn_reset_sound() {
        let config = SandboxConfig {
            seed: Some(1),
            ..Default::default()
        };
        let mut session = Session::initialize(&config, Box::new(MutedCue::new()));

        execute(&mut session, ControlCommand::Spawn(ShapeKind::Cylinder)).unwrap();
        execute(&mut session, ControlCommand::Spawn(ShapeKind::Sphere)).unwrap();
        assert_eq!(session.registry().len(), 2);

        let outcome = execute(&mut session, ControlCommand::Reset).unwrap();
        assert_eq!(outcome.lines, vec!["Removed 2 objects".to_string()]);
        assert!(session.registry().is_empty());

        execute(&mut session, ControlCommand::Sound(SoundSwitch::On)).unwrap();
        assert!(session.sound_enabled());
        execute(&mut session, ControlCommand::Sound(SoundSwitch::Toggle)).unwrap();
        assert!(!session.sound_enabled());

        assert!(execute(&mut session, ControlCommand::Quit).unwrap().quit);
    }
}
