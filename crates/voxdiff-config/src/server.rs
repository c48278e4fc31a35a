use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Address the editor extension talks to out of the box
pub const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    8000,
);

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    #[serde(default)]
    pub health: HealthConfig,
    /// CORS policy, wide open unless configured otherwise
    #[serde(default = "default_cors")]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS,
            health: HealthConfig::default(),
            cors: default_cors(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_listen_address() -> SocketAddr {
    DEFAULT_LISTEN_ADDRESS
}

#[allow(clippy::unnecessary_wraps)]
fn default_cors() -> Option<CorsConfig> {
    Some(CorsConfig::default())
}
