use crate::pathfinding::GridNode;
use derive_more::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Cooperative limits that end a generation run early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SafetyLimit {
    #[display("wall-clock ceiling")]
    WallClock,
    #[display("active agent cap")]
    AgentCount,
    #[display("step round cap")]
    RoundCount,
    #[display("string length cap")]
    StringLength,
    #[display("connection attempt cap")]
    ConnectionAttempts,
}

#[derive(Error, Debug)]
pub enum RoadNetError {
    // Fatal: reported before any generation work starts
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    // Recoverable at run level: logged, never returned from a generator
    #[error("No path from ({}, {}) to ({}, {})", start.x, start.z, goal.x, goal.z)]
    UnreachablePath { start: GridNode, goal: GridNode },

    #[error("Position ({x:.2}, {z:.2}) is outside terrain bounds")]
    BoundsViolation { x: f32, z: f32 },

    #[error("Safety limit reached: {limit}")]
    SafetyLimitReached { limit: SafetyLimit },

    // Config-file errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Settings validation failed: {reason}")]
    Validation { reason: String },
}

impl RoadNetError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Collapse validator output into one readable line
    pub fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let reason = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let msgs: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
                format!("{field}: {}", msgs.join(", "))
            })
            .collect::<Vec<String>>()
            .join("; ");

        Self::Validation {
            reason: if reason.is_empty() {
                errors.to_string()
            } else {
                reason
            },
        }
    }
}

/// Result type alias for all fallible operations
pub type RoadNetResult<T> = Result<T, RoadNetError>;
