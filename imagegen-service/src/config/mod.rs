use crate::services::inference::workers_ai::{WorkersAiConfig, WORKERS_AI_API_BASE};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ImagegenConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub workers_ai: WorkersAiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkersAiSettings {
    pub account_id: String,
    pub api_token: String,
    /// REST API base, overridable for staging or local stubs
    pub base_url: String,
}

impl ImagegenConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ImagegenConfig {
            common: common_config,
            workers_ai: WorkersAiSettings {
                account_id: get_env("CLOUDFLARE_ACCOUNT_ID", None, is_prod)?,
                api_token: get_env("CLOUDFLARE_API_TOKEN", None, is_prod)?,
                base_url: get_env("WORKERS_AI_BASE_URL", Some(WORKERS_AI_API_BASE), is_prod)?,
            },
        })
    }

    pub fn workers_ai(&self) -> WorkersAiConfig {
        WorkersAiConfig {
            account_id: self.workers_ai.account_id.clone(),
            api_token: self.workers_ai.api_token.clone(),
            base_url: self.workers_ai.base_url.clone(),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
