//! read client configuration from values, a file, the environment, or a secret

use aws_config::BehaviorVersion;
use secrecy::SecretString;
use serde::Deserialize;

use crate::errors::Error;

pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";

pub enum ConfigLocation {
    File(String),
    Env,
    Secret,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub corp_id: String,
    pub corp_secret: SecretString,
    pub agent_id: i64,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_values(
        corp_id: impl Into<String>,
        corp_secret: impl Into<String>,
        agent_id: i64,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            corp_id: corp_id.into(),
            corp_secret: SecretString::new(corp_secret.into()),
            agent_id,
            base_url,
            timeout_secs,
        }
    }

    /// Reads a JSON document with the same field names as `Config`.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// # ENV Vars
    /// * `WECOM_CORP_ID` - corp identity
    /// * `WECOM_CORP_SECRET` - application secret
    /// * `WECOM_AGENT_ID` - numeric application id
    /// * `WECOM_BASE_URL` - optional API base, defaults to the public endpoint
    /// * `WECOM_TIMEOUT_SECS` - optional request timeout
    pub fn from_env() -> Result<Self, Error> {
        let agent_id = required_env("WECOM_AGENT_ID")?;
        let agent_id = agent_id.parse().map_err(|_| {
            Error::Config(format!("WECOM_AGENT_ID must be an integer, got '{agent_id}'"))
        })?;
        let timeout_secs = match std::env::var("WECOM_TIMEOUT_SECS") {
            Ok(raw) => Some(raw.parse().map_err(|_| {
                Error::Config(format!("WECOM_TIMEOUT_SECS must be an integer, got '{raw}'"))
            })?),
            Err(_) => None,
        };
        Ok(Self::from_values(
            required_env("WECOM_CORP_ID")?,
            required_env("WECOM_CORP_SECRET")?,
            agent_id,
            std::env::var("WECOM_BASE_URL").ok(),
            timeout_secs,
        ))
    }

    /// Base URL with a scheme and without a trailing slash.
    pub fn resolved_base_url(&self) -> Result<String, Error> {
        let raw = self
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        let base = if raw.starts_with("http") {
            raw.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", raw.trim_end_matches('/'))
        };
        reqwest::Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base, e)))?;
        Ok(base)
    }
}

fn required_env(name: &str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::Config(format!("Missing {name} env var")))
}

pub async fn read_config(loc: ConfigLocation) -> Result<Config, Error> {
    match loc {
        ConfigLocation::File(path) => Config::from_file(path),
        ConfigLocation::Env => Config::from_env(),
        ConfigLocation::Secret => read_config_from_secret().await,
    }
}

async fn read_config_from_secret() -> Result<Config, Error> {
    let secret_arn = required_env("WECOM_CONFIG_SECRET_ARN")?;
    let client = aws_sdk_secretsmanager::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let resp = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
    let secret = resp
        .secret_string()
        .ok_or_else(|| Error::Config("Failed to get secret string, returned None".to_string()))?;
    Ok(serde_json::from_str(secret)?)
}
