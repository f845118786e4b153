use std::{str::FromStr, time::Duration};

use config::{Config, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Where the URL-shortener API lives and how patient we are with it.
#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    pub origin: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub retries: u32,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

/// Which overlay from `configurations/` sits on top of `base.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Production,
}

impl Environment {
    pub fn file_stem(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    /// Reads `APP_ENVIRONMENT`; unset means local.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        match std::env::var("APP_ENVIRONMENT") {
            Ok(name) => name.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for Environment {
    type Err = config::ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        [Environment::Local, Environment::Production]
            .into_iter()
            .find(|env| env.file_stem().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "unknown APP_ENVIRONMENT {name:?}, expected `local` or `production`"
                ))
            })
    }
}

/// base.yaml, then the environment overlay, then `APP_*` variables
/// (`APP_BACKEND__ORIGIN=https://api.example.com`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let directory = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("no current directory: {e}")))?
        .join("configurations");
    let environment = Environment::from_env()?;

    Config::builder()
        .add_source(File::from(directory.join("base")))
        .add_source(File::from(directory.join(environment.file_stem())))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
