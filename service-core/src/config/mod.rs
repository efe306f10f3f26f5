use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings every service shares, read from `configuration.*` and `APP__*`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Default tracing filter; `RUST_LOG` still takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// `host:port` to bind the HTTP listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config: Config = Cfg::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_take_effect() {
        let config: Config = Cfg::builder()
            .set_override("host", "127.0.0.1")
            .unwrap()
            .set_override("port", 0)
            .unwrap()
            .set_override("log_level", "debug")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:0");
        assert_eq!(config.log_level, "debug");
    }
}
