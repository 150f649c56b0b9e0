use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{ExportError, Result};

/// 启动无头浏览器并导航到指定 URL
///
/// 视口尺寸固定（来自配置），保证同一问题多次运行的截图坐标一致。
pub async fn launch_headless_browser(config: &Config, url: &str) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");
    debug!(
        "目标 URL: {}, 视口: {}x{}",
        url, config.viewport_width, config.viewport_height
    );

    // 配置无头浏览器
    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .window_size(config.viewport_width, config.viewport_height)
        .args(vec![
            "--disable-gpu",                 // 无头模式下禁用 GPU
            "--no-sandbox",                  // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage",       // 防止共享内存不足
            "--force-device-scale-factor=1", // 设备缩放固定为 1，截图坐标与 CSS 像素一致
            "--remote-debugging-port=0",     // 让浏览器自动选择调试端口
        ]);

    if let Some(executable) = &config.chrome_executable {
        builder = builder.chrome_executable(executable);
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        ExportError::validation(format!("配置无头浏览器失败: {}", e))
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        ExportError::browser("启动无头浏览器", e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建新页面并导航
    let page = browser.new_page(url).await.map_err(|e| {
        error!("创建页面失败: {}", e);
        ExportError::browser("创建页面", e)
    })?;

    info!("✅ 无头浏览器已导航到: {}", url);

    Ok((browser, page))
}
