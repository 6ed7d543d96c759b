pub mod config;

pub use config::{ApiConfig, AppConfig, SearchConfig};
