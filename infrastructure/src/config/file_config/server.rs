//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// Raw HTTP server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// bind_address = "0.0.0.0"
/// port = 8000
/// cors_allow_any_origin = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Install a permissive CORS layer
    pub cors_allow_any_origin: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            cors_allow_any_origin: true,
        }
    }
}

impl FileServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
