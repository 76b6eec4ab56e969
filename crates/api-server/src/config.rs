//! Environment configuration

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

const DEFAULT_TOKEN_SECRET: &str = "dev-access-token-secret-change-me";
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub token_secret: String,
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: String,
    pub smtp: Option<SmtpConfig>,
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            data_dir: PathBuf::from(".stay-data"),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            stripe_secret_key: None,
            stripe_api_base: "https://api.stripe.com".to_string(),
            smtp: None,
            allowed_origins: split_list(DEFAULT_ORIGINS),
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let token_secret = optional("ACCESS_TOKEN_SECRET").unwrap_or_else(|| {
            warn!("ACCESS_TOKEN_SECRET not set, using the development secret");
            defaults.token_secret.clone()
        });

        let smtp = match (optional("TRANSPORTER_EMAIL"), optional("TRANSPORTER_PASS")) {
            (Some(username), Some(password)) => Some(SmtpConfig {
                host: optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or("SMTP_PORT", 587),
                username,
                password,
            }),
            _ => {
                info!("TRANSPORTER_EMAIL/TRANSPORTER_PASS not set, emails will only be logged");
                None
            }
        };

        let environment = match optional("APP_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        Self {
            port: parse_or("PORT", defaults.port),
            data_dir: optional("STAY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            token_secret,
            stripe_secret_key: optional("STRIPE_SECRET_KEY"),
            stripe_api_base: optional("STRIPE_API_BASE").unwrap_or(defaults.stripe_api_base),
            smtp,
            allowed_origins: optional("ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or(defaults.allowed_origins),
            environment,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        None => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
