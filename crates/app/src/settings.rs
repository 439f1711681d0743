//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden by `FINANCAS__*` environment
//! variables (`FINANCAS__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use clap::Parser;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "financas", about = "Household finance API server")]
struct Args {
    /// Settings file, without or with the `.toml` extension.
    #[arg(long, env = "FINANCAS_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_port")]
    pub port: u16,
    pub bind: Option<String>,
    pub database: Database,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    pub auth: Option<Auth>,
}

#[derive(Debug, Deserialize)]
pub struct Dashboard {
    #[serde(default = "default_latest_limit")]
    pub latest_limit: usize,
    #[serde(default = "default_salary_category")]
    pub salary_category: String,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            latest_limit: default_latest_limit(),
            salary_category: default_salary_category(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub dashboard: Dashboard,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_latest_limit() -> usize {
    10
}

fn default_salary_category() -> String {
    "Salário".to_string()
}

impl Settings {
    /// Load the settings file named by `--config` (or `FINANCAS_CONFIG`),
    /// then apply environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        Self::from_source(File::with_name(path).required(false))
    }

    fn from_source<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("FINANCAS")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
