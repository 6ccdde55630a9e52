//! Configuration file loading

use crate::args::{ConnectionArgs, MaintainArgs};
use anyhow::{Context, Result, bail};
use scanhint_core::ConnectionSettings;
use scanhint_maintenance::DEFAULT_MAINTENANCE_TABLE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default seconds between maintenance runs
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("Could not determine config directory")
        .map(|p| p.join("scanhint"))
}

pub fn default_config_path() -> Result<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionSettings,
    pub maintenance: MaintenanceSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceSettings {
    pub interval_secs: u64,
    pub table: String,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            table: DEFAULT_MAINTENANCE_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub filter: String,
    /// Also write JSON logs to a daily file
    pub json_file: bool,
    /// Directory for the JSON log files
    pub log_dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "warn,scanhint_analyzer=info,scanhint_maintenance=info,scanhint_driver_mysql=info,scanhint=info".to_string(),
            json_file: false,
            log_dir: None,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used and a missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {:?}", path);
                }
                path.to_path_buf()
            }
            None => {
                let path = default_config_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.maintenance.interval_secs == 0 {
            bail!("maintenance.interval_secs must be greater than zero");
        }
        if self.connection.host.trim().is_empty() {
            bail!("connection.host must not be empty");
        }
        Ok(())
    }

    /// Applies command line and environment connection overrides
    pub fn apply_connection_args(&mut self, args: &ConnectionArgs) {
        let conn = &mut self.connection;
        if let Some(host) = &args.host {
            conn.host = host.clone();
        }
        if let Some(port) = args.port {
            conn.port = port;
        }
        if args.user.is_some() {
            conn.user = args.user.clone();
        }
        if args.password.is_some() {
            conn.password = args.password.clone();
        }
        if args.database.is_some() {
            conn.database = args.database.clone();
        }
    }

    /// Applies command line maintenance overrides
    pub fn apply_maintain_args(&mut self, args: &MaintainArgs) -> Result<()> {
        if let Some(interval_secs) = args.interval_secs {
            self.maintenance.interval_secs = interval_secs;
        }
        if let Some(table) = &args.table {
            self.maintenance.table = table.clone();
        }
        self.validate()
    }
}

#[cfg(test)]
mod tests;
