//! 导出格式定义
//!
//! 数据格式与可视化格式各自是封闭枚举，成员合法性在编译期确定；
//! 字符串输入只在 `FromStr` 边界做一次校验。

use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// 数据导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Xlsx,
}

impl DataFormat {
    /// 文件扩展名，同时也是查询导出端点的格式段
    pub fn extension(self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
            DataFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DataFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(DataFormat::Csv),
            "json" => Ok(DataFormat::Json),
            "xlsx" => Ok(DataFormat::Xlsx),
            other => Err(ExportError::validation(format!(
                "不支持的数据格式: {} (支持: csv|json|xlsx)",
                other
            ))),
        }
    }
}

/// 可视化导出格式
///
/// `Pdf` 仅对单个问题导出合法；仪表盘模式的逐卡片截图必须是
/// 栅格格式，最终合成产物固定为一份 PDF。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationFormat {
    Png,
    Jpg,
    Pdf,
}

impl VisualizationFormat {
    pub fn extension(self) -> &'static str {
        match self {
            VisualizationFormat::Png => "png",
            VisualizationFormat::Jpg => "jpg",
            VisualizationFormat::Pdf => "pdf",
        }
    }

    /// 是否为栅格图像格式
    pub fn is_raster(self) -> bool {
        !matches!(self, VisualizationFormat::Pdf)
    }
}

impl fmt::Display for VisualizationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for VisualizationFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(VisualizationFormat::Png),
            "jpg" => Ok(VisualizationFormat::Jpg),
            "pdf" => Ok(VisualizationFormat::Pdf),
            other => Err(ExportError::validation(format!(
                "不支持的可视化格式: {} (支持: png|jpg|pdf)",
                other
            ))),
        }
    }
}

/// 导出实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Question,
    Dashboard,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Question => f.write_str("question"),
            ExportKind::Dashboard => f.write_str("dashboard"),
        }
    }
}

impl FromStr for ExportKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(ExportKind::Question),
            "dashboard" => Ok(ExportKind::Dashboard),
            other => Err(ExportError::validation(format!(
                "不支持的导出类型: {} (支持: question|dashboard)",
                other
            ))),
        }
    }
}

/// 截图目标页面类型，对应 `{base}/{page_kind}/{id}` 路径段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Question,
    /// 仪表盘页面。当前导出流程逐卡片经由问题页面渲染，
    /// 此变体用于直接截取仪表盘页面的调用方。
    DashboardCard,
}

impl PageKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            PageKind::Question => "question",
            PageKind::DashboardCard => "dashboard",
        }
    }
}
