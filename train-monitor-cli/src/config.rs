//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use train_advisory::{EngineConfig, RowPolicy};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub thresholds: EngineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_input_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub malformed_rows: RowPolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_input_file(),
            malformed_rows: RowPolicy::default(),
        }
    }
}

fn default_input_file() -> PathBuf {
    PathBuf::from("sensordata.csv")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_conductor")]
    pub conductor: Credential,
    #[serde(default = "default_admin")]
    pub admin: Credential,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            conductor: default_conductor(),
            admin: default_admin(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_conductor() -> Credential {
    Credential::new("conductor", "password")
}

fn default_admin() -> Credential {
    Credential::new("admin", "password")
}

fn default_max_attempts() -> u32 {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Simulated time between two rows
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Sleep between ticks so the replay runs at recording speed
    #[serde(default = "default_true")]
    pub realtime: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            realtime: true,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn default_tick_interval() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub color: bool,
    /// Redraw the display in place instead of scrolling
    #[serde(default)]
    pub clear_screen: bool,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            clear_screen: false,
            log_format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Txt,
    Json,
}

impl AppConfig {
    /// Reject configurations the session cannot run with
    pub fn validate(&self) -> Result<()> {
        self.thresholds
            .validate()
            .context("Invalid [thresholds] section")?;

        if self.simulation.tick_interval_ms == 0 {
            bail!("simulation.tick_interval_ms must be greater than zero");
        }
        if self.credentials.max_attempts == 0 {
            bail!("credentials.max_attempts must be at least 1");
        }
        if self.credentials.conductor.username == self.credentials.admin.username {
            bail!(
                "conductor and admin share the username {:?}",
                self.credentials.admin.username
            );
        }

        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "trip.csv"
            malformed_rows = "abort"

            [credentials]
            conductor = { username = "driver", password = "s3cret" }
            max_attempts = 3

            [simulation]
            tick_interval_ms = 250
            realtime = false

            [output]
            log_format = "json"

            [thresholds]
            distance_alert_m = 1200.0
            horn_band = { lower = 1300.0, upper = 1400.0 }
            near_band = { lower = 100.0, upper = 1250.0 }
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, PathBuf::from("trip.csv"));
        assert_eq!(config.input.malformed_rows, RowPolicy::Abort);
        assert_eq!(config.credentials.conductor.username, "driver");
        assert_eq!(config.credentials.admin, default_admin());
        assert_eq!(config.credentials.max_attempts, 3);
        assert_eq!(config.simulation.tick_interval(), Duration::from_millis(250));
        assert!(!config.simulation.realtime);
        assert_eq!(config.output.log_format, LogFormat::Json);
        assert!(config.output.color);
        assert_eq!(config.thresholds.distance_alert_m, 1200.0);
        assert_eq!(config.thresholds.wheel_diameter_in, 33.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.input.file, PathBuf::from("sensordata.csv"));
        assert_eq!(config.credentials.max_attempts, 8);
        assert_eq!(config.simulation.tick_interval_ms, 5000);
        assert!(config.simulation.realtime);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.simulation.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.credentials.admin.username = "conductor".to_string();
        assert!(config.validate().is_err());

        let config: AppConfig = toml::from_str("[thresholds]\nwheel_diameter_in = 0.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
