pub mod api;
pub mod app_config;
pub mod search;

// Re-export main types for easier imports
pub use api::ApiConfig;
pub use app_config::AppConfig;
pub use search::SearchConfig;
