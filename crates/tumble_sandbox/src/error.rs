//! Sandbox error types

use std::path::PathBuf;
use tumble_audio::AudioError;
use tumble_physics::PhysicsError;
use tumble_render::{MeshHandle, RenderError};

/// Errors raised by the sandbox
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Config file could not be read
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the sandbox
    #[error("Failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// A registry record points at a mesh the scene no longer has
    #[error("Mesh {0:?} is missing from the scene")]
    MissingMesh(MeshHandle),

    /// Control input that is not a known command
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
}

/// Result type for sandbox operations
pub type Result<T> = std::result::Result<T, SandboxError>;
