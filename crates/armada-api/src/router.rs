//! Route table and handlers.
//!
//! Every handler resolves its path segments against the [`Master`] held in
//! [`ApiState`], turns the result into a view or an invocation, and lets
//! [`ApiError`] render failures.  Invocations run on the blocking pool: a
//! device command holds that device's lock for as long as the driver takes.

use std::sync::Arc;

use armada_hal::Master;
use armada_types::{ArmadaError, Params, Values};
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::auth::{self, Credentials};
use crate::config::ApiConfig;
use crate::error::{ApiError, error_body, json_response};
use crate::views::{ConnectionView, DeviceView, RobotView};

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    pub master: Arc<Master>,
}

type ApiResult = Result<Response, ApiError>;

/// The bare route table, without authentication or CORS.
pub fn routes(master: Arc<Master>) -> Router {
    Router::new()
        .route("/robots", get(list_robots))
        .route("/robots/{robot}", get(show_robot))
        .route("/robots/{robot}/commands", get(robot_commands))
        .route(
            "/robots/{robot}/commands/{command}",
            get(invoke_robot_command).post(invoke_robot_command),
        )
        .route("/robots/{robot}/devices", get(list_devices))
        .route("/robots/{robot}/devices/{device}", get(show_device))
        .route("/robots/{robot}/devices/{device}/commands", get(device_commands))
        .route(
            "/robots/{robot}/devices/{device}/commands/{command}",
            get(invoke_device_command).post(invoke_device_command),
        )
        .route("/robots/{robot}/connections", get(list_connections))
        .route("/robots/{robot}/connections/{connection}", get(show_connection))
        .fallback(unmatched)
        .method_not_allowed_fallback(wrong_method)
        .with_state(ApiState { master })
}

/// The full application: routes, basic auth when `config` enables it, and a
/// permissive CORS policy.
pub fn app(master: Arc<Master>, config: &ApiConfig) -> Router {
    let mut router = routes(master);
    if config.auth_enabled() {
        let credentials = Arc::new(Credentials::new(&config.username, &config.password));
        router = router.layer(axum::middleware::from_fn_with_state(
            credentials,
            auth::require_basic_auth,
        ));
    }
    router.layer(CorsLayer::permissive())
}

// ---------------------------------------------------------------------------
// Robots
// ---------------------------------------------------------------------------

async fn list_robots(State(state): State<ApiState>) -> ApiResult {
    let views: Vec<RobotView> = state
        .master
        .robots()
        .iter()
        .map(|r| RobotView::of(r))
        .collect();
    Ok(json_response(StatusCode::OK, &views))
}

async fn show_robot(State(state): State<ApiState>, Path(robot): Path<String>) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    Ok(json_response(StatusCode::OK, &RobotView::of(&robot)))
}

async fn robot_commands(State(state): State<ApiState>, Path(robot): Path<String>) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    Ok(json_response(StatusCode::OK, &robot.commands()))
}

async fn invoke_robot_command(
    State(state): State<ApiState>,
    Path((robot, command)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    let params = decode_params(&body);
    debug!(robot = %robot.name(), %command, "robot command");
    let values = blocking(move || robot.invoke(&command, params)).await?;
    Ok(json_response(StatusCode::OK, &values))
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

async fn list_devices(State(state): State<ApiState>, Path(robot): Path<String>) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    let views: Vec<DeviceView> = robot
        .devices()
        .iter()
        .map(|d| DeviceView::of(&robot, d))
        .collect();
    Ok(json_response(StatusCode::OK, &views))
}

async fn show_device(
    State(state): State<ApiState>,
    Path((robot, device)): Path<(String, String)>,
) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    let device = robot.device(&device)?;
    Ok(json_response(StatusCode::OK, &DeviceView::of(&robot, &device)))
}

async fn device_commands(
    State(state): State<ApiState>,
    Path((robot, device)): Path<(String, String)>,
) -> ApiResult {
    let device = state.master.find_robot(&robot)?.device(&device)?;
    Ok(json_response(StatusCode::OK, device.commands()))
}

async fn invoke_device_command(
    State(state): State<ApiState>,
    Path((robot, device, command)): Path<(String, String, String)>,
    body: Bytes,
) -> ApiResult {
    let device = state.master.find_robot(&robot)?.device(&device)?;
    let params = decode_params(&body);
    debug!(%robot, device = %device.name(), %command, "device command");
    let values = blocking(move || device.invoke(&command, params)).await?;
    Ok(json_response(StatusCode::OK, &values))
}

// ---------------------------------------------------------------------------
// Connections
// ---------------------------------------------------------------------------

async fn list_connections(State(state): State<ApiState>, Path(robot): Path<String>) -> ApiResult {
    let robot = state.master.find_robot(&robot)?;
    let views: Vec<ConnectionView> = robot
        .connections()
        .iter()
        .map(|c| ConnectionView::of(c))
        .collect();
    Ok(json_response(StatusCode::OK, &views))
}

async fn show_connection(
    State(state): State<ApiState>,
    Path((robot, connection)): Path<(String, String)>,
) -> ApiResult {
    let connection = state.master.find_robot(&robot)?.connection(&connection)?;
    Ok(json_response(StatusCode::OK, &ConnectionView::of(&connection)))
}

async fn unmatched() -> Response {
    error_body(StatusCode::NOT_FOUND, "no such route")
}

async fn wrong_method() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode a request body into a parameter map.  Anything other than a JSON
/// object (including an empty body) yields an empty map.
pub fn decode_params(body: &[u8]) -> Params {
    if body.is_empty() {
        return Params::new();
    }
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(other) => {
            debug!(kind = json_kind(&other), "non-object body ignored");
            Params::new()
        }
        Err(e) => {
            debug!(error = %e, "malformed body ignored");
            Params::new()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

async fn blocking<F>(op: F) -> Result<Values, ArmadaError>
where
    F: FnOnce() -> Result<Values, ArmadaError> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ArmadaError::fault("command", format!("invocation task failed: {e}")))?
}
