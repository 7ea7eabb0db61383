use std::env;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;
use url::Url;

pub const CARD_URL: &str = "https://random-data-api.com/api/coffee/random_coffee";
pub const IMAGE_URL: &str = "https://loremflickr.com/500/500/coffee bean";
pub const DEFAULT_PORT: u16 = 8080;

pub fn default_user_agent() -> String {
    format!("crema/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} is not a valid url: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{key} must be a positive integer in range, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Where cards come from and how requests to those places are made.
/// Every field has a default, tests only override the endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub card_url: Url,
    /// Used verbatim as the prefix of every image src, never normalized
    /// through [`Url`]
    pub image_url: String,
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            card_url: Url::parse(CARD_URL).expect("CARD_URL constant is a valid url"),
            image_url: IMAGE_URL.to_owned(),
            user_agent: default_user_agent(),
            request_timeout: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config out of any key/value source, unset keys fall back
    /// to their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(card_url) = lookup("CARD_URL") {
            config.card_url = Url::parse(&card_url).map_err(|source| ConfigError::InvalidUrl {
                key: "CARD_URL",
                source,
            })?;
        }
        if let Some(image_url) = lookup("IMAGE_URL") {
            config.image_url = image_url;
        }
        if let Some(user_agent) = lookup("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_MS") {
            let millis = parse_positive("REQUEST_TIMEOUT_MS", &timeout)?;
            config.request_timeout = Some(Duration::from_millis(millis));
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse_positive("PORT", &port).and_then(|n| {
                u16::try_from(n).map_err(|_| ConfigError::InvalidNumber {
                    key: "PORT",
                    value: port.clone(),
                })
            })?;
        }
        Ok(config)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            key,
            value: value.to_owned(),
        })
}
