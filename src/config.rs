use std::env;
use std::time::Duration;

use reqwest::Url;

use crate::error::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "https://orange.kent.ac.uk/api/logTicket/index.php";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT_VAR: &str = "FOOTPRINTS_ENDPOINT";
const CONNECT_TIMEOUT_VAR: &str = "FOOTPRINTS_CONNECT_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Url,
    /// Only applies to the raw fire-and-forget connection.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: &str) -> AppResult<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Reads `FOOTPRINTS_ENDPOINT` and `FOOTPRINTS_CONNECT_TIMEOUT_SECS`,
    /// falling back to the built-in defaults when unset.
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let mut config = Self::new(endpoint.trim())?;

        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "{CONNECT_TIMEOUT_VAR} must be a positive number of seconds, got '{raw}'"
                    ))
                })?;
            config.connect_timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn parse_endpoint(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw)
        .map_err(|err| AppError::Configuration(format!("invalid endpoint '{raw}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Configuration(format!(
            "endpoint '{raw}' must use http or https"
        )));
    }
    if url.host_str().is_none() {
        return Err(AppError::Configuration(format!(
            "endpoint '{raw}' has no host"
        )));
    }
    Ok(url)
}
