//! `armada-types` – shared vocabulary for the Armada workspace.
//!
//! Every crate in the workspace speaks in terms of the aliases and the error
//! enum defined here:
//!
//! - [`Params`] – the generic named-parameter mapping a command receives.
//! - [`Values`] – the ordered sequence of generic values a command returns.
//! - [`ArmadaError`] – the single error taxonomy, from entity resolution
//!   through argument coercion to transport failures.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use serde_json::Value;

/// Generic named-parameter mapping decoded from a request body.
pub type Params = serde_json::Map<String, Value>;

/// Ordered sequence of generic values produced by a command.
pub type Values = Vec<Value>;

/// Reserved parameter key under which a robot-level command receives the
/// name of the robot it was invoked on.
pub const ROBOT_NAME_KEY: &str = "robotname";

/// Sentinel payload returned when a command name does not resolve.
pub const UNKNOWN_COMMAND: &str = "Unknown Command";

/// Kind of entity held in the graph, used to qualify lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Robot,
    Device,
    Connection,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Robot => write!(f, "robot"),
            EntityKind::Device => write!(f, "device"),
            EntityKind::Connection => write!(f, "connection"),
        }
    }
}

/// Global error type spanning entity lookup, command dispatch, hardware
/// failures, configuration and transport problems.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArmadaError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("Unknown command '{command}' on {target}")]
    UnknownCommand { target: String, command: String },

    #[error("Argument mismatch for command '{command}': {details}")]
    ArgumentMismatch { command: String, details: String },

    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Transport Error: {0}")]
    Transport(String),
}

impl ArmadaError {
    /// Shorthand for a [`ArmadaError::NotFound`] of the given kind.
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        ArmadaError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for a [`ArmadaError::HardwareFault`].
    pub fn fault(component: impl Into<String>, details: impl Into<String>) -> Self {
        ArmadaError::HardwareFault {
            component: component.into(),
            details: details.into(),
        }
    }
}
