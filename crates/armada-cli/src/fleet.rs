//! The demo fleet the binary serves when started without a robot of its own.

use armada_hal::sim::SimRobot;
use armada_hal::{Master, Robot};
use serde::Deserialize;

#[derive(Deserialize)]
struct Greet {
    name: String,
}

/// `hellobot`: one robot-level command, `greet {name}` → `"hi <name>"`.
pub fn hellobot() -> Robot {
    Robot::new("hellobot").with_command("greet", |args: Greet| Ok(format!("hi {}", args.name)))
}

/// `simbot`: a loopback connection with a simulated LED and servo.
pub fn simbot() -> Robot {
    SimRobot::new("simbot").with_led("led").with_servo("servo").build()
}

pub fn demo() -> Master {
    let master = Master::new();
    master.add_robot(hellobot());
    master.add_robot(simbot());
    master
}

#[cfg(test)]
mod tests {
    use super::*;
    use armada_types::{ArmadaError, Params};
    use serde_json::json;

    #[test]
    fn hellobot_greets_by_name() {
        let robot = hellobot();
        let params: Params = serde_json::from_value(json!({"name": "bob"})).unwrap();
        assert_eq!(robot.commands(), vec!["greet"]);
        assert_eq!(robot.invoke("greet", params).unwrap(), vec![json!("hi bob")]);
    }

    #[test]
    fn hellobot_requires_a_name() {
        let err = hellobot().invoke("greet", Params::new()).unwrap_err();
        assert!(matches!(err, ArmadaError::ArgumentMismatch { .. }));
    }

    #[test]
    fn demo_fleet_starts_and_halts() {
        let master = demo();
        let names: Vec<String> = master.robots().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["hellobot", "simbot"]);

        master.start().unwrap();
        let servo = master.find_robot("simbot").unwrap().device("servo").unwrap();
        assert_eq!(servo.invoke("position", Params::new()).unwrap(), vec![json!(90.0)]);
        master.halt().unwrap();
    }
}
