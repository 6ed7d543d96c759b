use serde::{Deserialize, Serialize};

/// Search backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// "opensearch" 使用HTTP搜索后端，"memory" 使用内置内存后端
    pub backend: String,
    pub url: String,
    pub index: String,
    pub request_timeout_seconds: u64,
}

impl SearchConfig {
    /// Validate search backend configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_backends = ["opensearch", "memory"];
        if !valid_backends.contains(&self.backend.as_str()) {
            return Err(anyhow::anyhow!(
                "无效的搜索后端: {}，支持的后端: {:?}",
                self.backend,
                valid_backends
            ));
        }

        if self.backend == "opensearch" {
            if self.url.is_empty() {
                return Err(anyhow::anyhow!("搜索服务URL不能为空"));
            }

            if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
                return Err(anyhow::anyhow!("搜索服务URL必须是HTTP格式"));
            }
        }

        if self.index.is_empty() {
            return Err(anyhow::anyhow!("索引名称不能为空"));
        }

        // 索引名称规则与搜索后端保持一致
        if self.index.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(anyhow::anyhow!("索引名称不能包含大写字母"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("请求超时时间必须大于0"));
        }

        Ok(())
    }
}
