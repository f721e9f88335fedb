use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C；监听失败时直接返回，由调用方结束服务
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}
