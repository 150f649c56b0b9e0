//! 产物文件命名
//!
//! 文件名内嵌实体 ID 与捕获时间戳，避免多次运行之间的覆盖。
//! 同一输出目录下的并发运行不受保护，视为不支持的场景。

use crate::models::{DataFormat, VisualizationFormat};

/// 当前本地时间戳，格式 `%Y%m%d-%H%M%S`
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// 查询数据文件名：`query_result_{id}_{ts}.{ext}`
pub fn query_result_filename(question_id: u64, format: DataFormat) -> String {
    format!(
        "query_result_{}_{}.{}",
        question_id,
        timestamp(),
        format.extension()
    )
}

/// 问题可视化文件名：`question_{id}_{ts}.{ext}`
pub fn question_filename(question_id: u64, format: VisualizationFormat) -> String {
    format!(
        "question_{}_{}.{}",
        question_id,
        timestamp(),
        format.extension()
    )
}

/// 仪表盘合成文档文件名：`dashboard_{id}_{ts}.pdf`
pub fn dashboard_filename(dashboard_id: u64) -> String {
    format!("dashboard_{}_{}.pdf", dashboard_id, timestamp())
}
