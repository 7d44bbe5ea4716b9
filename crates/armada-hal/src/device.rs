//! [`Device`] – a named, controllable unit bound to one [`Driver`].
//!
//! A device owns its driver together with the driver's [`CommandTable`],
//! both behind a single mutex.  That mutex is the per-device serialization
//! point: at most one command or lifecycle hook runs against a driver at a
//! time, while commands on different devices proceed in parallel.
//!
//! Everything a view needs (driver type, adaptor name, command names) is
//! cached when the device is built, so listing and serializing devices never
//! waits for an in-flight command.

use std::sync::{Mutex, MutexGuard, PoisonError};

use armada_types::{ArmadaError, Params, Values};
use tracing::{debug, info};

use crate::command::CommandTable;
use crate::driver::Driver;
use crate::slots::Named;

// Type-erased driver + table pair.
trait Bound: Send {
    fn invoke(&mut self, command: &str, params: Params) -> Option<Result<Values, ArmadaError>>;
    fn start(&mut self) -> Result<(), ArmadaError>;
    fn halt(&mut self) -> Result<(), ArmadaError>;
}

struct BoundDriver<D: Driver> {
    driver: D,
    table: CommandTable<D>,
}

impl<D: Driver> Bound for BoundDriver<D> {
    fn invoke(&mut self, command: &str, params: Params) -> Option<Result<Values, ArmadaError>> {
        self.table.invoke(&mut self.driver, command, params)
    }

    fn start(&mut self) -> Result<(), ArmadaError> {
        self.driver.start()
    }

    fn halt(&mut self) -> Result<(), ArmadaError> {
        self.driver.halt()
    }
}

/// A named device wrapping a [`Driver`].
pub struct Device {
    name: String,
    driver_kind: String,
    adaptor: String,
    commands: Vec<String>,
    driver: Mutex<Box<dyn Bound>>,
}

impl Device {
    /// Build a device around `driver`, registering the driver type's
    /// commands.
    pub fn new<D: Driver>(name: impl Into<String>, driver: D) -> Self {
        let mut table = CommandTable::new();
        D::commands(&mut table);
        let name = name.into();
        let commands = table.names();
        debug!(device = %name, kind = driver.kind(), commands = commands.len(), "device built");
        Self {
            name,
            driver_kind: driver.kind().to_string(),
            adaptor: driver.adaptor().to_string(),
            commands,
            driver: Mutex::new(Box::new(BoundDriver { driver, table })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Driver type name.
    pub fn driver_kind(&self) -> &str {
        &self.driver_kind
    }

    /// Name of the adaptor the driver depends on.
    pub fn adaptor(&self) -> &str {
        &self.adaptor
    }

    /// Command names, in registration order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.commands.iter().any(|c| c == command)
    }

    /// Run `command` with `params`.
    ///
    /// Blocks until any command already running on this device finishes.
    ///
    /// # Errors
    ///
    /// - [`ArmadaError::UnknownCommand`] when the driver has no such command
    ///   (checked before the device lock is taken).
    /// - [`ArmadaError::ArgumentMismatch`] when `params` do not fit the
    ///   command's argument type.
    /// - Any error the command itself returns.
    pub fn invoke(&self, command: &str, params: Params) -> Result<Values, ArmadaError> {
        if !self.has_command(command) {
            return Err(self.unknown(command));
        }
        debug!(device = %self.name, command, "invoking device command");
        self.lock()
            .invoke(command, params)
            .unwrap_or_else(|| Err(self.unknown(command)))
    }

    /// Start the driver.
    ///
    /// # Errors
    ///
    /// Propagates the driver's [`Driver::start`] failure.
    pub fn start(&self) -> Result<(), ArmadaError> {
        info!(device = %self.name, kind = %self.driver_kind, "starting device");
        self.lock().start()
    }

    /// Halt the driver.
    ///
    /// # Errors
    ///
    /// Propagates the driver's [`Driver::halt`] failure.
    pub fn halt(&self) -> Result<(), ArmadaError> {
        info!(device = %self.name, "halting device");
        self.lock().halt()
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Bound>> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn unknown(&self, command: &str) -> ArmadaError {
        ArmadaError::UnknownCommand {
            target: format!("device '{}'", self.name),
            command: command.to_string(),
        }
    }
}

impl Named for Device {
    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("driver_kind", &self.driver_kind)
            .field("adaptor", &self.adaptor)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}
