//! Dynamic invocation boundary.
//!
//! Commands cross the wire as an untyped [`Params`] map and come back as an
//! untyped [`Values`] sequence.  The helpers here sit between that boundary
//! and a command's typed body:
//!
//! - [`coerce`] deserializes the map into the argument type the command
//!   declares, turning any shape mismatch into
//!   [`ArmadaError::ArgumentMismatch`].
//! - [`normalize`] serializes whatever the command returned into an ordered
//!   value sequence.
//!
//! # Normalization rules
//!
//! | Return value serializes to | Resulting sequence |
//! |---|---|
//! | JSON array (tuples, `Vec<T>`, arrays) | its elements, in order |
//! | `null` (`()`, `None`) | empty |
//! | anything else | one element |

use armada_types::{ArmadaError, Params, ROBOT_NAME_KEY, Value, Values};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Argument type for commands that take no parameters.
///
/// Deserializes from any JSON object and ignores its contents, so a command
/// declared with `NoArgs` accepts `{}`, a missing body, or stray keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
pub struct NoArgs {}

/// Deserialize `params` into the argument type `A` expected by `command`.
///
/// # Errors
///
/// Returns [`ArmadaError::ArgumentMismatch`] when the map does not fit `A`
/// (missing field, wrong JSON type, numeric overflow, …).
pub fn coerce<A: DeserializeOwned>(command: &str, params: Params) -> Result<A, ArmadaError> {
    serde_json::from_value(Value::Object(params)).map_err(|e| ArmadaError::ArgumentMismatch {
        command: command.to_string(),
        details: e.to_string(),
    })
}

/// Serialize a command's return value into an ordered [`Values`] sequence.
///
/// # Errors
///
/// Returns [`ArmadaError::Serialization`] when the value cannot be
/// represented as JSON (e.g. a map with non-string keys).
pub fn normalize<R: Serialize>(command: &str, ret: R) -> Result<Values, ArmadaError> {
    let value = serde_json::to_value(ret).map_err(|e| {
        ArmadaError::Serialization(format!("result of command '{command}': {e}"))
    })?;
    Ok(match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

/// Return `params` with the invoking robot's name stored under
/// [`ROBOT_NAME_KEY`], overwriting any client-supplied value.
pub fn with_robot_name(mut params: Params, robot: &str) -> Params {
    params.insert(ROBOT_NAME_KEY.to_string(), Value::String(robot.to_string()));
    params
}
