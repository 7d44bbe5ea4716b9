//! [`ApiConfig`] – bind address, credentials and TLS material for the API
//! server.

use serde::{Deserialize, Serialize};

/// Default TCP port for the API server.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address (all interfaces).
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Server configuration.  Every field has a default, so an empty TOML table
/// is a valid configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.  `0` asks the OS for a free port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Basic-auth user name.  Authentication is enabled when non-empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Basic-auth password.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,

    /// Path to a PEM certificate chain.  TLS is enabled when both `cert` and
    /// `key` are non-empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert: String,

    /// Path to the PEM private key matching `cert`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            cert: String::new(),
            key: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn auth_enabled(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn tls_enabled(&self) -> bool {
        !self.cert.is_empty() && !self.key.is_empty()
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field(
                "password",
                if self.password.is_empty() { &"<not set>" } else { &"<redacted>" },
            )
            .field("cert", &self.cert)
            .field("key", &self.key)
            .finish()
    }
}
