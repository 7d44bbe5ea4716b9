//! `armada-hal` – the fleet's entity graph and command dispatch.
//!
//! # Modules
//!
//! - [`master`] – [`Master`]: the registry of robots, passed around as an
//!   explicit `Arc<Master>` context.
//! - [`robot`] – [`Robot`]: devices, connections and robot-level commands.
//! - [`device`] / [`driver`] – [`Device`] wraps one [`Driver`] and serializes
//!   every command sent to it.
//! - [`connection`] / [`adaptor`] – [`Connection`] wraps one [`Adaptor`].
//! - [`command`] – per-driver and per-robot command tables.
//! - [`invoke`] – coercion of untyped parameters into typed arguments and
//!   normalization of results into ordered value sequences.
//! - [`sim`] – simulated adaptors and drivers for tests and demos.

pub mod adaptor;
pub mod command;
pub mod connection;
pub mod device;
pub mod driver;
pub mod invoke;
pub mod master;
pub mod robot;
pub mod sim;

mod slots;

pub use adaptor::Adaptor;
pub use command::{CommandTable, RobotCommands};
pub use connection::Connection;
pub use device::Device;
pub use driver::Driver;
pub use invoke::NoArgs;
pub use master::Master;
pub use robot::Robot;
