//! Generic `Driver` trait for anything a [`Device`][crate::device::Device]
//! controls: LEDs, servos, motor controllers, sensors.
//!
//! A driver declares its commands once, through [`Driver::commands`].  The
//! rest of the system only ever sees command names and untyped parameter
//! maps, so new drivers can be attached without touching the API layer.

use armada_types::ArmadaError;

use crate::command::CommandTable;

/// A device-specific capability with its own command set.
///
/// Implementations need not be thread-safe internally: the owning
/// [`Device`][crate::device::Device] serializes every call, so at most one
/// command (or lifecycle hook) runs against a driver at a time.
pub trait Driver: Send + 'static {
    /// Type name reported in device views, e.g. `"SimLed"`.
    fn kind(&self) -> &str;

    /// Name of the adaptor (and therefore connection) this driver talks
    /// through.
    fn adaptor(&self) -> &str;

    /// Register this driver type's commands.  Called once, when a device is
    /// built around the driver.
    fn commands(table: &mut CommandTable<Self>)
    where
        Self: Sized;

    /// Bring the driver up.  Called by [`Robot::start`][crate::robot::Robot::start]
    /// after every connection has been opened.
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::HardwareFault`] if the device cannot be started.
    fn start(&mut self) -> Result<(), ArmadaError> {
        Ok(())
    }

    /// Stop the driver.  Called by [`Robot::halt`][crate::robot::Robot::halt].
    ///
    /// # Errors
    ///
    /// Returns [`ArmadaError::HardwareFault`] if the device cannot be halted.
    fn halt(&mut self) -> Result<(), ArmadaError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::NoArgs;
    use armada_types::Params;
    use serde::Deserialize;

    /// Minimal in-process driver used only for tests.
    struct MockMotor {
        speed: i32,
        running: bool,
    }

    #[derive(Deserialize)]
    struct Speed {
        speed: i32,
    }

    impl Driver for MockMotor {
        fn kind(&self) -> &str {
            "MockMotor"
        }

        fn adaptor(&self) -> &str {
            "bus"
        }

        fn commands(table: &mut CommandTable<Self>) {
            table
                .command("speed", |m: &mut MockMotor, args: Speed| {
                    m.speed = args.speed;
                    Ok(m.speed)
                })
                .command("running", |m: &mut MockMotor, _: NoArgs| Ok(m.running));
        }

        fn start(&mut self) -> Result<(), ArmadaError> {
            self.running = true;
            Ok(())
        }
    }

    #[test]
    fn mock_motor_registers_and_runs_commands() {
        let mut table = CommandTable::new();
        MockMotor::commands(&mut table);
        assert_eq!(table.names(), vec!["speed", "running"]);

        let mut motor = MockMotor {
            speed: 0,
            running: false,
        };
        motor.start().unwrap();
        assert!(motor.halt().is_ok());

        let params: Params = serde_json::from_str(r#"{"speed": -40}"#).unwrap();
        let out = table.invoke(&mut motor, "speed", params).unwrap().unwrap();
        assert_eq!(out, vec![serde_json::json!(-40)]);
        assert_eq!(motor.speed, -40);
        assert_eq!(motor.kind(), "MockMotor");
        assert_eq!(motor.adaptor(), "bus");
    }
}
