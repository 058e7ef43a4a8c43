/*
 * Responsibility
 * - read process settings from the environment (PORT, APP_ENV, AUTHZ_*, limits)
 * - fail startup when something required is missing
 *
 * Group list validation itself belongs to authz::GroupPolicy; this module only
 * collects the raw values into a GateConfig.
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::authz::GateConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GATE_NAME: &str = "groups-gate";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub gate_name: String,
    pub gate: GateConfig,

    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, EnvError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EnvError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| EnvError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let gate_name = lookup("AUTHZ_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_GATE_NAME.to_string());

        let groups = lookup("AUTHZ_GROUPS")
            .map(|s| parse_list(&s))
            .ok_or(EnvError::Missing("AUTHZ_GROUPS"))?;

        let mut gate = GateConfig::with_groups(groups);
        if let Some(claim) = lookup("AUTHZ_GROUPS_CLAIM") {
            // empty is fine here: GroupPolicy falls back to the default claim
            gate = gate.groups_claim(claim.trim());
        }

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| EnvError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        };

        let body_limit_bytes = match lookup("BODY_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| EnvError::Invalid("BODY_LIMIT_BYTES"))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        Ok(Self {
            addr,
            app_env,
            gate_name,
            gate,
            request_timeout,
            body_limit_bytes,
        })
    }
}

/// Comma-separated list; entries are trimmed and empty ones dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
