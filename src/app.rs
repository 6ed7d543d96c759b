use std::sync::Arc;

use anyhow::{Context, Result};
use taskboard_api::create_app;
use taskboard_core::AppConfig;
use taskboard_domain::SearchStore;
use taskboard_infrastructure::{HttpSearchStore, MemorySearchStore};
use taskboard_service::TodoService;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{error, info};

/// 主应用程序
pub struct Application {
    config: AppConfig,
    service: Arc<TodoService>,
}

impl Application {
    /// 创建应用实例：按配置选择存储后端并准备好索引
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store = create_search_store(&config)?;

        // 索引模板与索引建立失败属于启动级错误
        store.ensure_index().await.context("初始化索引失败")?;

        let service = Arc::new(TodoService::new(store));

        Ok(Self { config, service })
    }

    /// 运行API服务器直到收到关闭信号
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let app = create_app(Arc::clone(&self.service), &self.config.api);

        let listener = TcpListener::bind(&self.config.api.bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {}", self.config.api.bind_address))?;

        info!("API服务器启动在 http://{}", self.config.api.bind_address);

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                error!("API服务器运行失败: {}", e);
            }
        });

        let _ = shutdown_rx.recv().await;
        info!("API服务器收到关闭信号");

        server_handle.abort();

        info!("API服务器已停止");
        Ok(())
    }
}

/// 按配置的后端类型创建文档存储
fn create_search_store(config: &AppConfig) -> Result<Arc<dyn SearchStore>> {
    match config.search.backend.as_str() {
        "opensearch" => {
            info!(
                "使用搜索引擎后端: {}，索引: {}",
                mask_url(&config.search.url),
                config.search.index
            );
            let store =
                HttpSearchStore::new(&config.search).context("创建搜索引擎客户端失败")?;
            Ok(Arc::new(store))
        }
        "memory" => {
            info!("使用内存存储后端，数据不落盘");
            Ok(Arc::new(MemorySearchStore::new()))
        }
        other => Err(anyhow::anyhow!("不支持的搜索后端: {other}")),
    }
}

/// 屏蔽URL中的密码部分
fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let mut masked = url.to_string();
            masked.replace_range(colon_pos + 1..at_pos, "***");
            return masked;
        }
    }
    url.to_string()
}
