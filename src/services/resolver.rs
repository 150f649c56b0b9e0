//! 仪表盘解析器 - 业务能力层
//!
//! 把仪表盘 ID 解析为按布局顺序排列的问题卡片列表与仪表盘信息。

use serde_json::Value;
use tracing::{debug, info};

use crate::api::MetabaseClient;
use crate::error::{ExportError, Result};
use crate::models::{DashboardInfo, QuestionRef};

/// 仪表盘解析器
pub struct DashboardResolver;

impl DashboardResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析仪表盘，返回 (问题卡片列表, 仪表盘信息)
    ///
    /// 只调用一次元数据端点；卡片顺序即 API 返回的布局顺序。
    pub async fn resolve(
        &self,
        client: &MetabaseClient,
        dashboard_id: u64,
    ) -> Result<(Vec<QuestionRef>, DashboardInfo)> {
        let body = client.dashboard(dashboard_id).await?;
        let (questions, info) = parse_dashboard(dashboard_id, &body)?;

        info!(
            "✓ 仪表盘「{}」解析完成，共 {} 个问题卡片",
            info.name,
            questions.len()
        );

        Ok((questions, info))
    }
}

impl Default for DashboardResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 从仪表盘元数据响应体解析问题卡片与仪表盘信息
///
/// 卡片数组兼容经典的 `ordered_cards` 与较新版本的 `dashcards`
/// 两种字段名。缺少 `name` 或卡片数组的响应视为格式错误。
///
/// 缺少 id 或标题的卡片条目（文本/Markdown 卡片等非问题内容）
/// 静默跳过，这是有意的行为，不是错误。
pub fn parse_dashboard(
    dashboard_id: u64,
    body: &Value,
) -> Result<(Vec<QuestionRef>, DashboardInfo)> {
    let name = body
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExportError::resolution(dashboard_id, "响应缺少 name 字段"))?
        .to_string();

    let description = body
        .get("description")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let cards = body
        .get("ordered_cards")
        .or_else(|| body.get("dashcards"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| ExportError::resolution(dashboard_id, "响应缺少卡片数组"))?;

    let mut questions = Vec::new();
    for entry in cards {
        let card = entry.get("card");
        let id = card.and_then(|c| c.get("id")).and_then(|v| v.as_u64());
        let title = card
            .and_then(|c| c.get("name"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        match (id, title) {
            (Some(id), Some(title)) => questions.push(QuestionRef { id, title }),
            _ => debug!("跳过非问题卡片条目"),
        }
    }

    Ok((questions, DashboardInfo { name, description }))
}
