//! [`Robot`] – a named aggregate of connections, devices and robot-level
//! commands.
//!
//! All structural changes go through `&self`: the device list, connection
//! list and command table each sit behind their own read-mostly lock, so a
//! robot can be reshaped while requests are being served against it.

use std::sync::{Arc, RwLock};

use armada_types::{ArmadaError, EntityKind, Params, Values};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::adaptor::Adaptor;
use crate::command::RobotCommands;
use crate::connection::Connection;
use crate::device::Device;
use crate::driver::Driver;
use crate::invoke;
use crate::slots::{self, Named};

/// A robot in the fleet.
///
/// # Example
///
/// ```
/// use armada_hal::robot::Robot;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Greet {
///     name: String,
/// }
///
/// let bot = Robot::new("hellobot")
///     .with_command("greet", |args: Greet| Ok(vec![format!("hi {}", args.name)]));
///
/// let params = serde_json::from_str(r#"{"name":"bob"}"#).unwrap();
/// assert_eq!(bot.invoke("greet", params).unwrap(), vec![serde_json::json!("hi bob")]);
/// ```
pub struct Robot {
    name: String,
    connections: RwLock<Vec<Arc<Connection>>>,
    devices: RwLock<Vec<Arc<Device>>>,
    commands: RwLock<RobotCommands>,
}

impl Robot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connections: RwLock::new(Vec::new()),
            devices: RwLock::new(Vec::new()),
            commands: RwLock::new(RobotCommands::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -----------------------------------------------------------------------
    // Builder-style attach
    // -----------------------------------------------------------------------

    /// Attach a connection wrapping `adaptor` (builder-style).
    pub fn with_connection(self, adaptor: impl Adaptor) -> Self {
        self.add_connection(Connection::new(adaptor));
        self
    }

    /// Attach a device named `name` driven by `driver` (builder-style).
    pub fn with_device<D: Driver>(self, name: impl Into<String>, driver: D) -> Self {
        self.add_device(Device::new(name, driver));
        self
    }

    /// Register a typed robot-level command (builder-style).
    pub fn with_command<A, R, F>(self, name: impl Into<String>, op: F) -> Self
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(A) -> Result<R, ArmadaError> + Send + Sync + 'static,
    {
        self.add_command(name, op);
        self
    }

    // -----------------------------------------------------------------------
    // Connections
    // -----------------------------------------------------------------------

    /// Attach `connection`.  A connection with the same name is replaced in
    /// place and returned.
    pub fn add_connection(&self, connection: Connection) -> Option<Arc<Connection>> {
        info!(robot = %self.name, connection = connection.name(), "attaching connection");
        slots::upsert(&self.connections, Arc::new(connection))
    }

    /// Detach the connection called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such connection exists.
    pub fn remove_connection(&self, name: &str) -> Result<Arc<Connection>, ArmadaError> {
        slots::take(&self.connections, name)
            .ok_or_else(|| ArmadaError::not_found(EntityKind::Connection, name))
    }

    /// Look up a connection by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such connection exists.
    pub fn connection(&self, name: &str) -> Result<Arc<Connection>, ArmadaError> {
        slots::find(&self.connections, name)
            .ok_or_else(|| ArmadaError::not_found(EntityKind::Connection, name))
    }

    /// Snapshot of all connections, in attach order.
    pub fn connections(&self) -> Vec<Arc<Connection>> {
        slots::snapshot(&self.connections)
    }

    // -----------------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------------

    /// Attach `device`.  A device with the same name is replaced in place and
    /// returned.
    pub fn add_device(&self, device: Device) -> Option<Arc<Device>> {
        info!(robot = %self.name, device = device.name(), kind = device.driver_kind(), "attaching device");
        slots::upsert(&self.devices, Arc::new(device))
    }

    /// Detach the device called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such device exists.
    pub fn remove_device(&self, name: &str) -> Result<Arc<Device>, ArmadaError> {
        slots::take(&self.devices, name).ok_or_else(|| ArmadaError::not_found(EntityKind::Device, name))
    }

    /// Look up a device by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such device exists.
    pub fn device(&self, name: &str) -> Result<Arc<Device>, ArmadaError> {
        slots::find(&self.devices, name).ok_or_else(|| ArmadaError::not_found(EntityKind::Device, name))
    }

    /// Snapshot of all devices, in attach order.
    pub fn devices(&self) -> Vec<Arc<Device>> {
        slots::snapshot(&self.devices)
    }

    // -----------------------------------------------------------------------
    // Robot-level commands
    // -----------------------------------------------------------------------

    /// Register a typed robot-level command.  The parameter map (including
    /// the reserved `"robotname"` key) is coerced into `A`.
    ///
    /// Robot commands run without any lock held; state they capture must be
    /// synchronized by the caller.
    pub fn add_command<A, R, F>(&self, name: impl Into<String>, op: F)
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(A) -> Result<R, ArmadaError> + Send + Sync + 'static,
    {
        slots::write(&self.commands).command(name, op);
    }

    /// Register a robot-level command working on the raw parameter map.
    pub fn add_raw_command<F>(&self, name: impl Into<String>, op: F)
    where
        F: Fn(Params) -> Result<Values, ArmadaError> + Send + Sync + 'static,
    {
        slots::write(&self.commands).raw(name, op);
    }

    /// Robot-level command names, in registration order.
    pub fn commands(&self) -> Vec<String> {
        slots::read(&self.commands).names()
    }

    /// Run the robot-level command `command`.  The robot's name is added to
    /// `params` under the reserved `"robotname"` key.
    ///
    /// # Errors
    ///
    /// - [`ArmadaError::UnknownCommand`] when no such command is registered.
    /// - [`ArmadaError::ArgumentMismatch`] from typed commands.
    /// - Any error the command itself returns.
    pub fn invoke(&self, command: &str, params: Params) -> Result<Values, ArmadaError> {
        let op = slots::read(&self.commands)
            .get(command)
            .ok_or_else(|| ArmadaError::UnknownCommand {
                target: format!("robot '{}'", self.name),
                command: command.to_string(),
            })?;
        op(invoke::with_robot_name(params, &self.name))
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Open every connection, then start every device.
    ///
    /// Every entity is attempted even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered.
    pub fn start(&self) -> Result<(), ArmadaError> {
        info!(robot = %self.name, "starting robot");
        let mut first = None;
        for conn in self.connections() {
            record(&mut first, &self.name, conn.connect());
        }
        for dev in self.devices() {
            record(&mut first, &self.name, dev.start());
        }
        first.map_or(Ok(()), Err)
    }

    /// Halt every device, then close every connection.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered.
    pub fn halt(&self) -> Result<(), ArmadaError> {
        info!(robot = %self.name, "halting robot");
        let mut first = None;
        for dev in self.devices() {
            record(&mut first, &self.name, dev.halt());
        }
        for conn in self.connections() {
            record(&mut first, &self.name, conn.finalize());
        }
        first.map_or(Ok(()), Err)
    }
}

fn record(first: &mut Option<ArmadaError>, robot: &str, result: Result<(), ArmadaError>) {
    if let Err(e) = result {
        error!(robot = %robot, error = %e, "lifecycle step failed");
        if first.is_none() {
            *first = Some(e);
        }
    }
}

impl Named for Robot {
    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("name", &self.name)
            .field("connections", &self.connections())
            .field("devices", &self.devices())
            .field("commands", &self.commands())
            .finish()
    }
}
