//! 仪表盘元数据模型

use serde::Deserialize;

/// 仪表盘中一个问题卡片的引用
///
/// 由解析器按仪表盘布局顺序产出，顺序即导出顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRef {
    pub id: u64,
    pub title: String,
}

/// 仪表盘自身的名称与描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardInfo {
    pub name: String,
    pub description: Option<String>,
}

/// 可视化元素的布局矩形（来自 getBoundingClientRect）
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ElementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
