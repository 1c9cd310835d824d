//! Client configuration from environment variables

use std::net::SocketAddr;

use anyhow::Context;

use crate::core::ControllerConfig;
use crate::types::{COUNTDOWN_MS, LINE_CLEAR_DELAY_MS, SUBMIT_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Hex felt of the local account; empty to take it from the relay's welcome
    pub player_id: String,
    pub client_name: String,
    pub countdown_ms: u32,
    pub line_clear_delay_ms: u32,
    pub submit_timeout_ms: u32,
    pub log_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            player_id: String::new(),
            client_name: "grimblock".to_string(),
            countdown_ms: COUNTDOWN_MS,
            line_clear_delay_ms: LINE_CLEAR_DELAY_MS,
            submit_timeout_ms: SUBMIT_TIMEOUT_MS,
            log_path: None,
        }
    }
}

impl ClientConfig {
    /// Read `GRIMBLOCK_*` variables; unset or unparsable values keep their defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        fn number<T: std::str::FromStr>(key: &str, default: T) -> T {
            std::env::var(key)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        let host = env::var("GRIMBLOCK_RELAY_HOST").unwrap_or(defaults.host);
        let player_id = env::var("GRIMBLOCK_PLAYER_ID")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let log_path = env::var("GRIMBLOCK_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            host,
            port: number("GRIMBLOCK_RELAY_PORT", defaults.port),
            player_id,
            client_name: defaults.client_name,
            countdown_ms: number("GRIMBLOCK_COUNTDOWN_MS", defaults.countdown_ms),
            line_clear_delay_ms: number(
                "GRIMBLOCK_LINE_CLEAR_DELAY_MS",
                defaults.line_clear_delay_ms,
            ),
            submit_timeout_ms: number("GRIMBLOCK_SUBMIT_TIMEOUT_MS", defaults.submit_timeout_ms),
            log_path,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid relay address {}:{}", self.host, self.port))
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            countdown_ms: self.countdown_ms,
            line_clear_delay_ms: self.line_clear_delay_ms,
        }
    }
}
