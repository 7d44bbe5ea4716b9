//! In-process simulated hardware for tests, CI and the demo fleet.
//!
//! | Type | Behaviour |
//! |---|---|
//! | [`SimAdaptor`] | Loopback channel; tracks whether it is connected. |
//! | [`SimLed`] | On/off state and an 8-bit brightness. |
//! | [`SimServo`] | Angle in degrees, clamped to `0.0..=180.0`. |
//! | [`SimRobot`] | Builder for a [`Robot`] wired from the above. |
//!
//! # Example
//!
//! ```rust
//! use armada_hal::sim::SimRobot;
//! use armada_types::Params;
//!
//! let robot = SimRobot::new("simbot")
//!     .with_led("led")
//!     .with_servo("servo")
//!     .build();
//!
//! let led = robot.device("led").unwrap();
//! led.invoke("on", Params::new()).expect("sim led must turn on");
//! ```

use armada_types::ArmadaError;
use serde::Deserialize;

use crate::adaptor::Adaptor;
use crate::command::CommandTable;
use crate::driver::Driver;
use crate::invoke::NoArgs;
use crate::robot::Robot;

/// Default name of the loopback connection a [`SimRobot`] carries.
pub const LOOPBACK: &str = "loopback";

// ────────────────────────────────────────────────────────────────────────────
// Loopback adaptor
// ────────────────────────────────────────────────────────────────────────────

/// A simulated connection that always succeeds.
pub struct SimAdaptor {
    name: String,
    port: String,
    connected: bool,
}

impl SimAdaptor {
    pub fn new(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port: port.into(),
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Adaptor for SimAdaptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "SimAdaptor"
    }

    fn port(&self) -> &str {
        &self.port
    }

    fn connect(&mut self) -> Result<(), ArmadaError> {
        self.connected = true;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), ArmadaError> {
        self.connected = false;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LED
// ────────────────────────────────────────────────────────────────────────────

/// A simulated dimmable LED.
///
/// Commands: `on`, `off`, `toggle` (each returns the new on/off state),
/// `brightness {level: 0-255}` (returns the level), `state` (returns
/// `[on, brightness]`).
pub struct SimLed {
    adaptor: String,
    on: bool,
    brightness: u8,
}

#[derive(Deserialize)]
struct Brightness {
    level: u8,
}

impl SimLed {
    pub fn new(adaptor: impl Into<String>) -> Self {
        Self {
            adaptor: adaptor.into(),
            on: false,
            brightness: u8::MAX,
        }
    }
}

impl Driver for SimLed {
    fn kind(&self) -> &str {
        "SimLed"
    }

    fn adaptor(&self) -> &str {
        &self.adaptor
    }

    fn commands(table: &mut CommandTable<Self>) {
        table
            .command("on", |led: &mut SimLed, _: NoArgs| {
                led.on = true;
                Ok(led.on)
            })
            .command("off", |led: &mut SimLed, _: NoArgs| {
                led.on = false;
                Ok(led.on)
            })
            .command("toggle", |led: &mut SimLed, _: NoArgs| {
                led.on = !led.on;
                Ok(led.on)
            })
            .command("brightness", |led: &mut SimLed, args: Brightness| {
                led.brightness = args.level;
                Ok(led.brightness)
            })
            .command("state", |led: &mut SimLed, _: NoArgs| {
                Ok((led.on, led.brightness))
            });
    }

    fn halt(&mut self) -> Result<(), ArmadaError> {
        self.on = false;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Servo
// ────────────────────────────────────────────────────────────────────────────

/// Servo travel limit in degrees.
pub const SERVO_MAX_DEG: f64 = 180.0;

/// A simulated hobby servo.
///
/// Commands: `move {angle}` (clamped to `0.0..=180.0`, returns the applied
/// angle), `center`, `position`.
pub struct SimServo {
    adaptor: String,
    angle: f64,
}

#[derive(Deserialize)]
struct Angle {
    angle: f64,
}

impl SimServo {
    pub fn new(adaptor: impl Into<String>) -> Self {
        Self {
            adaptor: adaptor.into(),
            angle: 0.0,
        }
    }
}

impl Driver for SimServo {
    fn kind(&self) -> &str {
        "SimServo"
    }

    fn adaptor(&self) -> &str {
        &self.adaptor
    }

    fn commands(table: &mut CommandTable<Self>) {
        table
            .command("move", |servo: &mut SimServo, args: Angle| {
                servo.angle = args.angle.clamp(0.0, SERVO_MAX_DEG);
                Ok(servo.angle)
            })
            .command("center", |servo: &mut SimServo, _: NoArgs| {
                servo.angle = SERVO_MAX_DEG / 2.0;
                Ok(servo.angle)
            })
            .command("position", |servo: &mut SimServo, _: NoArgs| Ok(servo.angle));
    }

    fn start(&mut self) -> Result<(), ArmadaError> {
        self.angle = SERVO_MAX_DEG / 2.0;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRobot builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for a [`Robot`] populated with simulated hardware.
///
/// Every simulated robot carries one [`SimAdaptor`] connection (named
/// [`LOOPBACK`] unless overridden) and every device it builds depends on it.
pub struct SimRobot {
    name: String,
    connection: String,
    port: String,
    leds: Vec<String>,
    servos: Vec<String>,
}

impl SimRobot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connection: LOOPBACK.to_string(),
            port: "sim://0".to_string(),
            leds: Vec::new(),
            servos: Vec::new(),
        }
    }

    /// Rename the loopback connection and set its port.
    pub fn with_connection(mut self, name: impl Into<String>, port: impl Into<String>) -> Self {
        self.connection = name.into();
        self.port = port.into();
        self
    }

    /// Add a [`SimLed`] device.
    pub fn with_led(mut self, name: impl Into<String>) -> Self {
        self.leds.push(name.into());
        self
    }

    /// Add a [`SimServo`] device.
    pub fn with_servo(mut self, name: impl Into<String>) -> Self {
        self.servos.push(name.into());
        self
    }

    /// Consume the builder and return the assembled [`Robot`].
    pub fn build(self) -> Robot {
        let mut robot =
            Robot::new(self.name).with_connection(SimAdaptor::new(&self.connection, self.port));
        for name in self.leds {
            robot = robot.with_device(name, SimLed::new(&self.connection));
        }
        for name in self.servos {
            robot = robot.with_device(name, SimServo::new(&self.connection));
        }
        robot
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
