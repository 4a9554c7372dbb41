//! Server configuration.

use std::time::Duration;

use roomcast_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::RoomcastError;

/// Port used when neither `ROOMCAST_BIND` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Everything needed to start a [`RoomcastServer`](crate::RoomcastServer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Close a connection that sends nothing for this long. `None` (the
    /// default) keeps quiet connections open until the client hangs up.
    pub idle_timeout: Option<Duration>,

    /// Capacity of the channel feeding the core actor.
    pub core_channel_size: usize,

    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            idle_timeout: None,
            core_channel_size: 256,
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads overrides from the process environment.
    ///
    /// - `ROOMCAST_BIND` — full bind address, wins over `PORT`
    /// - `PORT` — port on `0.0.0.0`
    /// - `ROOMCAST_IDLE_TIMEOUT_SECS` — idle timeout, `0` disables it
    ///
    /// # Errors
    /// [`RoomcastError::Config`] if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, RoomcastError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RoomcastError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("ROOMCAST_BIND") {
            config.bind_addr = addr;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| {
                RoomcastError::Config(format!("PORT is not a valid port: {port:?}"))
            })?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Some(secs) = lookup("ROOMCAST_IDLE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                RoomcastError::Config(format!(
                    "ROOMCAST_IDLE_TIMEOUT_SECS is not a number: {secs:?}"
                ))
            })?;
            config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}
