//! 配置管理模块
//!
//! 负责加载和校验待办事项服务的运行配置，支持 TOML 文件与环境变量覆盖。
//!
//! 加载优先级（从低到高）：内置默认值、TOML 配置文件、`TASKBOARD__` 前缀的环境变量。

pub mod models;

pub use models::{ApiConfig, AppConfig, SearchConfig};
