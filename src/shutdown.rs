use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

/// 优雅关闭协调器
///
/// 后台任务通过 [`subscribe`](Self::subscribe) 获取关闭信号接收器，
/// 主流程收到进程信号后调用 [`shutdown`](Self::shutdown) 广播通知。
#[derive(Clone)]
pub struct ShutdownManager {
    /// 关闭信号发送器，关闭后置为 None
    signal_tx: Arc<RwLock<Option<broadcast::Sender<()>>>>,
    /// 是否已触发关闭
    triggered: Arc<RwLock<bool>>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (signal_tx, _) = broadcast::channel(16);

        Self {
            signal_tx: Arc::new(RwLock::new(Some(signal_tx))),
            triggered: Arc::new(RwLock::new(false)),
        }
    }

    /// 订阅关闭信号
    ///
    /// 关闭已经触发时返回一个立即可读的接收器，晚到的订阅者不会漏掉信号。
    pub async fn subscribe(&self) -> broadcast::Receiver<()> {
        let signal_tx = self.signal_tx.read().await;
        match *signal_tx {
            Some(ref tx) => tx.subscribe(),
            None => {
                let (tx, rx) = broadcast::channel(1);
                let _ = tx.send(());
                rx
            }
        }
    }

    /// 广播关闭信号，重复调用只生效一次
    pub async fn shutdown(&self) {
        let mut triggered = self.triggered.write().await;
        if *triggered {
            debug!("关闭已触发过，忽略重复调用");
            return;
        }

        info!("触发系统关闭");
        *triggered = true;

        let signal_tx = self.signal_tx.read().await;
        if let Some(ref tx) = *signal_tx {
            debug!("发送关闭信号给 {} 个订阅者", tx.receiver_count());

            // 可能没有接收者，发送失败可以忽略
            let _ = tx.send(());
        }

        drop(signal_tx);
        *self.signal_tx.write().await = None;

        info!("关闭信号已发送");
    }

    /// 检查是否已触发关闭
    pub async fn _is_shutdown(&self) -> bool {
        *self.triggered.read().await
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
