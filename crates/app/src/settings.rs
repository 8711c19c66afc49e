//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `SALDO__*` environment variables, e.g.
//! `SALDO__SERVER__PORT=8080`.
//!
//! See `settings.example.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Reports {
    pub series_months: u32,
    pub include_unpaid_in_balance: bool,
}

impl Default for Reports {
    fn default() -> Self {
        let defaults = server::ReportSettings::default();
        Self {
            series_months: defaults.series_months,
            include_unpaid_in_balance: defaults.include_unpaid_in_balance,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub reports: Reports,
}

#[derive(Debug, Parser)]
#[command(name = "saldo", version)]
struct Args {
    /// Optional config file path (TOML), without or with extension.
    #[arg(long)]
    config: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    port: Option<u16>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(args.config.is_some()))
            .add_source(Environment::with_prefix("SALDO").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if !(1..=engine::MAX_SERIES_MONTHS).contains(&settings.reports.series_months) {
            return Err(ConfigError::Message(format!(
                "reports.series_months must be between 1 and {}",
                engine::MAX_SERIES_MONTHS
            )));
        }

        Ok(settings)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    pub fn report_settings(&self) -> server::ReportSettings {
        server::ReportSettings {
            series_months: self.reports.series_months,
            include_unpaid_in_balance: self.reports.include_unpaid_in_balance,
        }
    }
}
