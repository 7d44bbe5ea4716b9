//! Command registry – name → operation tables.
//!
//! Two kinds of table exist:
//!
//! - [`CommandTable<D>`] is built once per device when it is attached, by
//!   the driver's [`Driver::commands`][crate::driver::Driver::commands]
//!   hook.  Its operations receive `&mut D`.
//! - [`RobotCommands`] holds operations an integrator registers directly on a
//!   [`Robot`][crate::robot::Robot].  They receive only the parameter map.
//!
//! Both tables keep registration order and resolve names exactly
//! (case-sensitive).  Registering a name twice replaces the earlier
//! operation but keeps its original position.

use std::sync::Arc;

use armada_types::{ArmadaError, Params, Values};
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::invoke;

type DriverOp<D> = Box<dyn Fn(&mut D, Params) -> Result<Values, ArmadaError> + Send + Sync>;

/// Shared handle to a robot-level operation.
pub type RobotOp = Arc<dyn Fn(Params) -> Result<Values, ArmadaError> + Send + Sync>;

/// Per-driver command table.
///
/// # Example
///
/// ```
/// use armada_hal::command::CommandTable;
/// use armada_hal::invoke::NoArgs;
/// use armada_types::Params;
///
/// struct Counter(u32);
///
/// let mut table = CommandTable::<Counter>::new();
/// table.command("bump", |c: &mut Counter, _: NoArgs| {
///     c.0 += 1;
///     Ok(c.0)
/// });
///
/// let mut counter = Counter(0);
/// let out = table.invoke(&mut counter, "bump", Params::new()).unwrap().unwrap();
/// assert_eq!(out, vec![serde_json::json!(1)]);
/// ```
pub struct CommandTable<D> {
    entries: IndexMap<String, DriverOp<D>>,
}

impl<D> Default for CommandTable<D> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<D> CommandTable<D> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed operation.
    ///
    /// The parameter map is coerced into `A` before `op` runs, and the value
    /// `op` returns is normalized into a [`Values`] sequence (see
    /// [`invoke`][crate::invoke] for the rules).
    pub fn command<A, R, F>(&mut self, name: impl Into<String>, op: F) -> &mut Self
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(&mut D, A) -> Result<R, ArmadaError> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        self.entries.insert(
            name,
            Box::new(move |driver, params| {
                let args = invoke::coerce(&label, params)?;
                let ret = op(driver, args)?;
                invoke::normalize(&label, ret)
            }),
        );
        self
    }

    /// Register an operation that works on the raw parameter map.
    pub fn raw<F>(&mut self, name: impl Into<String>, op: F) -> &mut Self
    where
        F: Fn(&mut D, Params) -> Result<Values, ArmadaError> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Box::new(op));
        self
    }

    /// Registered command names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Whether `name` is registered (exact, case-sensitive match).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the driver declared no commands.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `name` against `driver`.  Returns `None` when no such command is
    /// registered.
    pub fn invoke(
        &self,
        driver: &mut D,
        name: &str,
        params: Params,
    ) -> Option<Result<Values, ArmadaError>> {
        self.entries.get(name).map(|op| op(driver, params))
    }
}

/// Robot-level command table.
#[derive(Default)]
pub struct RobotCommands {
    entries: IndexMap<String, RobotOp>,
}

impl RobotCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed operation.  See [`CommandTable::command`].
    pub fn command<A, R, F>(&mut self, name: impl Into<String>, op: F)
    where
        A: DeserializeOwned,
        R: Serialize,
        F: Fn(A) -> Result<R, ArmadaError> + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        self.entries.insert(
            name,
            Arc::new(move |params| {
                let args = invoke::coerce(&label, params)?;
                let ret = op(args)?;
                invoke::normalize(&label, ret)
            }),
        );
    }

    /// Register an operation that works on the raw parameter map.
    pub fn raw<F>(&mut self, name: impl Into<String>, op: F)
    where
        F: Fn(Params) -> Result<Values, ArmadaError> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(op));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Look up `name`, returning a shared handle so the caller can run it
    /// after releasing any lock on the table.
    pub fn get(&self, name: &str) -> Option<RobotOp> {
        self.entries.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::NoArgs;
    use serde::Deserialize;
    use serde_json::json;

    struct Lamp {
        level: u8,
    }

    #[derive(Deserialize)]
    struct Level {
        level: u8,
    }

    fn lamp_table() -> CommandTable<Lamp> {
        let mut table = CommandTable::new();
        table
            .command("set", |lamp: &mut Lamp, args: Level| {
                lamp.level = args.level;
                Ok(lamp.level)
            })
            .command("read", |lamp: &mut Lamp, _: NoArgs| Ok(lamp.level))
            .raw("echo", |_lamp: &mut Lamp, params: Params| {
                Ok(params.into_iter().map(|(_, v)| v).collect())
            });
        table
    }

    fn params(v: serde_json::Value) -> Params {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn names_follow_registration_order() {
        let table = lamp_table();
        assert_eq!(table.names(), vec!["set", "read", "echo"]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn typed_command_coerces_and_mutates() {
        let table = lamp_table();
        let mut lamp = Lamp { level: 0 };
        let out = table
            .invoke(&mut lamp, "set", params(json!({"level": 7})))
            .unwrap()
            .unwrap();
        assert_eq!(out, vec![json!(7)]);
        assert_eq!(lamp.level, 7);
    }

    #[test]
    fn raw_command_sees_untouched_params() {
        let table = lamp_table();
        let mut lamp = Lamp { level: 0 };
        let out = table
            .invoke(&mut lamp, "echo", params(json!({"a": "x"})))
            .unwrap()
            .unwrap();
        assert_eq!(out, vec![json!("x")]);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let table = lamp_table();
        let mut lamp = Lamp { level: 3 };
        assert!(table.contains("read"));
        assert!(!table.contains("Read"));
        assert!(table.invoke(&mut lamp, "Read", Params::new()).is_none());
        assert!(table.invoke(&mut lamp, "rea", Params::new()).is_none());
        assert_eq!(lamp.level, 3);
    }

    #[test]
    fn mismatched_args_leave_driver_untouched() {
        let table = lamp_table();
        let mut lamp = Lamp { level: 5 };
        let result = table
            .invoke(&mut lamp, "set", params(json!({"level": "bright"})))
            .unwrap();
        assert!(matches!(result, Err(ArmadaError::ArgumentMismatch { .. })));
        assert_eq!(lamp.level, 5);
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut table = lamp_table();
        table.command("set", |lamp: &mut Lamp, _: NoArgs| {
            lamp.level = 255;
            Ok("replaced")
        });
        assert_eq!(table.names(), vec!["set", "read", "echo"]);

        let mut lamp = Lamp { level: 0 };
        let out = table
            .invoke(&mut lamp, "set", Params::new())
            .unwrap()
            .unwrap();
        assert_eq!(out, vec![json!("replaced")]);
        assert_eq!(lamp.level, 255);
    }

    #[test]
    fn robot_commands_typed_and_raw() {
        #[derive(Deserialize)]
        struct Greet {
            name: String,
        }

        let mut commands = RobotCommands::new();
        commands.command("greet", |args: Greet| Ok(vec![format!("hi {}", args.name)]));
        commands.raw("count", |params: Params| Ok(vec![json!(params.len())]));
        assert_eq!(commands.names(), vec!["greet", "count"]);

        let greet = commands.get("greet").unwrap();
        assert_eq!(
            greet(params(json!({"name": "bob"}))).unwrap(),
            vec![json!("hi bob")]
        );
        assert!(commands.get("Greet").is_none());
    }
}
