use anyhow::Result;

use metabase_exporter::models::ExportRequest;
use metabase_exporter::utils::logging;
use metabase_exporter::{Config, Exporter};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置与导出请求
    let config = Config::from_env();
    let request = ExportRequest::from_env()?;

    // 建立会话并执行导出
    let mut exporter = Exporter::connect(config).await?;
    let result = exporter.export(&request).await;

    // 无论导出结果如何都要回收浏览器进程
    exporter.close().await?;
    result?;

    Ok(())
}
