use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{api::ApiConfig, search::SearchConfig};

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                backend: "opensearch".to_string(),
                url: "http://localhost:9200".to_string(),
                index: "todos".to_string(),
                request_timeout_seconds: 30,
            },
            api: ApiConfig {
                bind_address: "0.0.0.0:8080".to_string(),
                cors_enabled: true,
                cors_origins: vec!["*".to_string()],
                request_timeout_seconds: 30,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from config file and environment variables
    ///
    /// Load order:
    /// 1. Default configuration
    /// 2. Config file (TOML format)
    /// 3. Environment variable overrides (prefix: TASKBOARD__)
    ///
    /// # Arguments
    ///
    /// * `config_path` - Config file path, if None use default paths
    ///
    /// # Returns
    ///
    /// Returns loaded and validated configuration
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // 1. Structure defaults, lowest priority
        let mut builder = ConfigBuilder::builder()
            .set_default("search.backend", "opensearch")?
            .set_default("search.url", "http://localhost:9200")?
            .set_default("search.index", "todos")?
            .set_default("search.request_timeout_seconds", 30)?
            .set_default("api.bind_address", "0.0.0.0:8080")?
            .set_default("api.cors_enabled", true)?
            .set_default("api.cors_origins", vec!["*"])?
            .set_default("api.request_timeout_seconds", 30)?;

        // 2. Load config file if provided
        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else {
            // Try to load default config files
            let default_paths = [
                "config/taskboard.toml",
                "taskboard.toml",
                "/etc/taskboard/config.toml",
            ];

            for path in &default_paths {
                if Path::new(path).exists() {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                    break;
                }
            }
        }

        // 3. Environment variable overrides (prefix: TASKBOARD__) - highest priority
        builder = builder.add_source(
            Environment::with_prefix("TASKBOARD")
                .separator("__")
                .try_parsing(true),
        );

        // Build configuration
        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// Validate configuration effectiveness
    pub fn validate(&self) -> Result<()> {
        self.search.validate().context("搜索配置验证失败")?;

        self.api.validate().context("API配置验证失败")?;

        Ok(())
    }
}
