//! [`Connection`] – a named communication channel owned by a robot.

use std::sync::{Mutex, PoisonError};

use armada_types::ArmadaError;
use tracing::info;

use crate::adaptor::Adaptor;
use crate::slots::Named;

/// A robot's communication channel, wrapping one [`Adaptor`].
///
/// The adaptor's name, type and port are captured when the connection is
/// built, so listing and serializing connections never waits on an adaptor
/// that is busy connecting.
pub struct Connection {
    name: String,
    kind: String,
    port: String,
    adaptor: Mutex<Box<dyn Adaptor>>,
}

impl Connection {
    pub fn new(adaptor: impl Adaptor) -> Self {
        Self {
            name: adaptor.name().to_string(),
            kind: adaptor.kind().to_string(),
            port: adaptor.port().to_string(),
            adaptor: Mutex::new(Box::new(adaptor)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adaptor type name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Open the underlying channel.
    ///
    /// # Errors
    ///
    /// Propagates the adaptor's [`Adaptor::connect`] failure.
    pub fn connect(&self) -> Result<(), ArmadaError> {
        info!(connection = %self.name, port = %self.port, "connecting");
        self.adaptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .connect()
    }

    /// Close the underlying channel.
    ///
    /// # Errors
    ///
    /// Propagates the adaptor's [`Adaptor::finalize`] failure.
    pub fn finalize(&self) -> Result<(), ArmadaError> {
        info!(connection = %self.name, "finalizing");
        self.adaptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finalize()
    }
}

impl Named for Connection {
    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
