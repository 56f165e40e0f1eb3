use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::{anyhow, Context};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub frontend_port: u16,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Deadline for all provider calls of one request. Always below
    /// `request_timeout` so a slow upstream is answered with 404.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    ///
    /// Fails when `FRONTEND_PORT` or `BACKEND_PORT` is missing or not a port.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let frontend_port = required_port(&var, "FRONTEND_PORT")?;
        let backend_port = required_port(&var, "BACKEND_PORT")?;

        let host: IpAddr = var("STOCKDATA_LISTEN_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("Invalid STOCKDATA_LISTEN_HOST")?;
        let timeout_ms: u64 = var("STOCKDATA_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        let upstream_cap_ms = timeout_ms * 4 / 5;
        let upstream_ms: u64 = var("STOCKDATA_UPSTREAM_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(upstream_cap_ms)
            .min(upstream_cap_ms);

        Ok(Self {
            listen_addr: SocketAddr::new(host, backend_port),
            frontend_port,
            cors_allow: vec![format!("http://localhost:{}", frontend_port)],
            request_timeout: Duration::from_millis(timeout_ms),
            upstream_timeout: Duration::from_millis(upstream_ms),
        })
    }
}

fn required_port(var: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<u16> {
    let raw = var(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{} environment variable not set.", key))?;
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {}: {}", key, raw))
}
