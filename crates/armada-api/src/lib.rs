//! `armada-api` – the fleet's HTTP surface.
//!
//! Exposes a [`Master`](armada_hal::Master) over HTTP/1.1 (optionally TLS):
//!
//! 1. **Lists and shows** robots, devices and connections as JSON views.
//! 2. **Invokes** robot-level and device-level commands by name, with a JSON
//!    object body as the parameter map.  `GET` and `POST` are equivalent on
//!    invocation routes.
//! 3. **Guards** every route with basic auth when a user name is configured,
//!    and allows cross-origin requests from anywhere.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use armada_api::{ApiConfig, ApiServer};
//! use armada_hal::{Master, Robot};
//!
//! #[tokio::main]
//! async fn main() {
//!     let master = Arc::new(Master::new());
//!     master.add_robot(Robot::new("hellobot"));
//!     let handle = ApiServer::new(Arc::clone(&master), ApiConfig::default())
//!         .start()
//!         .await
//!         .expect("api server failed");
//!     tokio::signal::ctrl_c().await.ok();
//!     handle.stop().await;
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod router;
pub mod server;
pub mod tls;
pub mod views;

pub use config::{ApiConfig, DEFAULT_HOST, DEFAULT_PORT};
pub use error::ApiError;
pub use router::{app, routes};
pub use server::{ApiHandle, ApiServer};
pub use views::{ConnectionView, DeviceView, RobotView};
