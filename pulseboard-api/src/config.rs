use pulseboard_client::client::DEFAULT_API_BASE_URL;
use pulseboard_common::util::{NonPositiveDurationError, PositiveDuration};
use serde::Deserialize;
use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
#[error("Invalid {setting}: {source}")]
pub struct ConfigError {
    setting: &'static str,
    source: NonPositiveDurationError,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub struct Env {
    pub server_address: IpAddr,
    pub server_port: u16,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn positive_secs(setting: &'static str, secs: u64) -> Result<PositiveDuration, ConfigError> {
    PositiveDuration::try_from(Duration::from_secs(secs))
        .map_err(|source| ConfigError { setting, source })
}

impl Env {
    #[must_use]
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.server_address, self.server_port)
    }

    pub fn poll_interval(&self) -> Result<PositiveDuration, ConfigError> {
        positive_secs("POLL_INTERVAL_SECS", self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Result<PositiveDuration, ConfigError> {
        positive_secs("REQUEST_TIMEOUT_SECS", self.request_timeout_secs)
    }
}
