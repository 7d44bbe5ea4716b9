//! [`Master`] – the fleet registry.
//!
//! A `Master` is an ordinary value: construct one at startup, wrap it in an
//! [`Arc`], and hand clones to whatever serves it (the HTTP API, a REPL, a
//! test).  There is no process-wide instance.

use std::sync::{Arc, RwLock};

use armada_types::{ArmadaError, EntityKind};
use tracing::info;

use crate::robot::Robot;
use crate::slots;

/// Registry of every [`Robot`] in the fleet, in attach order.
///
/// # Example
///
/// ```
/// use armada_hal::{Master, Robot};
///
/// let master = Master::new();
/// master.add_robot(Robot::new("alpha"));
/// master.add_robot(Robot::new("beta"));
///
/// assert_eq!(master.find_robot("beta").unwrap().name(), "beta");
/// assert!(master.find_robot("gamma").is_err());
/// ```
#[derive(Default)]
pub struct Master {
    robots: RwLock<Vec<Arc<Robot>>>,
}

impl Master {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `robot`.  A robot with the same name is replaced in place and
    /// returned.
    pub fn add_robot(&self, robot: Robot) -> Option<Arc<Robot>> {
        info!(robot = robot.name(), "attaching robot");
        slots::upsert(&self.robots, Arc::new(robot))
    }

    /// Detach the robot called `name`.  The robot is not halted.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such robot exists.
    pub fn remove_robot(&self, name: &str) -> Result<Arc<Robot>, ArmadaError> {
        slots::take(&self.robots, name).ok_or_else(|| ArmadaError::not_found(EntityKind::Robot, name))
    }

    /// Look up a robot by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::NotFound`] when no such robot exists.
    pub fn find_robot(&self, name: &str) -> Result<Arc<Robot>, ArmadaError> {
        slots::find(&self.robots, name).ok_or_else(|| ArmadaError::not_found(EntityKind::Robot, name))
    }

    /// Snapshot of all robots, in attach order.
    pub fn robots(&self) -> Vec<Arc<Robot>> {
        slots::snapshot(&self.robots)
    }

    /// Start every robot (connections first, then devices).
    ///
    /// # Errors
    ///
    /// Returns the first failure; every robot is still attempted.
    pub fn start(&self) -> Result<(), ArmadaError> {
        let robots = self.robots();
        info!(robots = robots.len(), "starting fleet");
        collect_first(robots.iter().map(|r| r.start()))
    }

    /// Halt every robot (devices first, then connections).
    ///
    /// # Errors
    ///
    /// Returns the first failure; every robot is still attempted.
    pub fn halt(&self) -> Result<(), ArmadaError> {
        let robots = self.robots();
        info!(robots = robots.len(), "halting fleet");
        collect_first(robots.iter().map(|r| r.halt()))
    }
}

// Drain `results` completely, keeping the first error.
fn collect_first(results: impl Iterator<Item = Result<(), ArmadaError>>) -> Result<(), ArmadaError> {
    results.fold(Ok(()), |acc, r| acc.and(r))
}
