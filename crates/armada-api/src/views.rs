//! Wire views of the entity graph.
//!
//! Views are flat, serializable snapshots.  A device view embeds the view of
//! the connection its driver depends on; that reference is resolved through
//! the owning robot each time the view is built, never stored on the device.

use armada_hal::{Connection, Device, Robot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotView {
    pub name: String,
    pub commands: Vec<String>,
    pub devices: Vec<DeviceView>,
    pub connections: Vec<ConnectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    pub name: String,
    pub driver_type: String,
    /// `None` when the driver's adaptor names no connection on the robot.
    pub connection: Option<ConnectionView>,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionView {
    pub name: String,
    pub port: String,
    pub adaptor_type: String,
}

impl RobotView {
    pub fn of(robot: &Robot) -> Self {
        Self {
            name: robot.name().to_string(),
            commands: robot.commands(),
            devices: robot
                .devices()
                .iter()
                .map(|d| DeviceView::of(robot, d))
                .collect(),
            connections: robot
                .connections()
                .iter()
                .map(|c| ConnectionView::of(c))
                .collect(),
        }
    }
}

impl DeviceView {
    /// Project `device`, resolving its connection among `robot`'s.
    pub fn of(robot: &Robot, device: &Device) -> Self {
        Self {
            name: device.name().to_string(),
            driver_type: device.driver_kind().to_string(),
            connection: robot
                .connection(device.adaptor())
                .ok()
                .map(|c| ConnectionView::of(&c)),
            commands: device.commands().to_vec(),
        }
    }
}

impl ConnectionView {
    pub fn of(connection: &Connection) -> Self {
        Self {
            name: connection.name().to_string(),
            port: connection.port().to_string(),
            adaptor_type: connection.kind().to_string(),
        }
    }
}
