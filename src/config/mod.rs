use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use log::{info, warn};

/// Marker for `data_dir` that keeps every collection in memory only
pub const IN_MEMORY: &str = ":memory:";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub cors_origin: String,
    pub body_limit: usize,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5004,
            data_dir: PathBuf::from("data"),
            cors_origin: "*".to_string(),
            body_limit: 2 * 1024 * 1024,
        }
    }

    /// Overlay `NUPTIAL_*` environment variables on the defaults
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            host: try_load("NUPTIAL_HOST", defaults.host),
            port: try_load("NUPTIAL_PORT", defaults.port),
            data_dir: try_load("NUPTIAL_DATA_DIR", defaults.data_dir),
            cors_origin: try_load("NUPTIAL_CORS_ORIGIN", defaults.cors_origin),
            body_limit: try_load("NUPTIAL_BODY_LIMIT", defaults.body_limit),
        }
    }

    /// Whether the store should skip writing snapshots to disk
    pub fn in_memory(&self) -> bool {
        self.data_dir.as_os_str() == IN_MEMORY
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        match format!("{}:{}", self.host, self.port).parse() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Invalid host '{}' ({}), binding to 0.0.0.0", self.host, e);
                SocketAddr::from(([0, 0, 0, 0], self.port))
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Invalid {key} value '{raw}': {e}, using default {default:?}");
                default
            }
        },
        Err(_) => {
            info!("{key} not set, using default: {default:?}");
            default
        }
    }
}
