//! Handles settings for the application.
//!
//! Values are read, in increasing priority, from built-in defaults, the
//! optional `settings.toml` (or the file passed with `--config`) and the
//! `HOMEBUDGET__*` environment variables, e.g. `HOMEBUDGET__AUTH__SECRET_KEY`.

use std::net::SocketAddr;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "homebudget", version, about = "Personal finance tracker")]
pub struct Cli {
    /// Settings file, without or with extension.
    #[arg(long, env = "HOMEBUDGET_CONFIG", default_value = "settings")]
    pub config: String,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("invalid setting `{0}`: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level applied to the homebudget crates.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    /// sqlite database, e.g. `sqlite:./homebudget.db?mode=rwc` or
    /// `sqlite::memory:`.
    pub database: String,
    pub bind: String,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|err| SettingsError::Invalid("server.bind", format!("{err}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    /// bcrypt cost; the bcrypt default when unset.
    pub password_cost: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Budget {
    /// Amount of the opening transaction of new users, e.g. `"1000.00"`.
    pub initial_transaction_amount: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: Auth,
    pub budget: Budget,
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.database", "sqlite:./homebudget.db?mode=rwc")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("auth.algorithm", "HS256")?
            .set_default("auth.access_token_expire_minutes", 30)?
            .set_default("budget.initial_transaction_amount", "1000.00")?
            .add_source(File::with_name(&cli.config).required(false))
            .add_source(Environment::with_prefix("HOMEBUDGET").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        if settings.auth.secret_key.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "auth.secret_key",
                "must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}
