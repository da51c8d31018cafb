use anyhow::{bail, Result};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unsupported LOG_FORMAT: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    /// Explicit `LOG_FORMAT`; see [`AppConfig::log_format`] for the default.
    pub log_format: Option<LogFormat>,
    pub auth_base_url: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT")
            .ok()
            .map(|v| LogFormat::parse(&v))
            .transpose()?;
        let auth_base_url =
            env::var("AUTH_BASE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());
        let run_migrations = env::var("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            log_format,
            auth_base_url,
            run_migrations,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// JSON logs in production unless `LOG_FORMAT` says otherwise.
    pub fn log_format(&self) -> LogFormat {
        match self.log_format {
            Some(format) => format,
            None if self.is_production() => LogFormat::Json,
            None => LogFormat::Text,
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::parse("text").unwrap(), LogFormat::Text);
        assert!(LogFormat::parse("xml").is_err());
    }

    fn config(environment: &str, log_format: Option<LogFormat>) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: environment.to_string(),
            log_level: "info".to_string(),
            log_format,
            auth_base_url: "http://auth".to_string(),
            run_migrations: false,
        }
    }

    #[test]
    fn test_server_address() {
        assert_eq!(config("production", None).server_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_log_format_defaults_by_environment() {
        assert_eq!(config("production", None).log_format(), LogFormat::Json);
        assert_eq!(config("development", None).log_format(), LogFormat::Text);
        assert_eq!(
            config("production", Some(LogFormat::Text)).log_format(),
            LogFormat::Text
        );
    }
}
