//! 导出请求参数

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ExportError, Result};
use crate::models::format::{DataFormat, ExportKind, VisualizationFormat};

/// 一次导出任务的全部参数
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// 问题或仪表盘 ID
    pub id: u64,
    /// 导出实体类型
    pub kind: ExportKind,
    /// 是否导出查询数据
    pub with_data: bool,
    /// 是否导出可视化
    pub with_visualization: bool,
    /// 数据格式
    pub data_format: DataFormat,
    /// 可视化格式（仪表盘模式下为逐卡片截图格式，最终产物固定为 PDF）
    pub visualization_format: VisualizationFormat,
    /// 仪表盘数据导出后保留每个问题的独立数据文件（数据文件本就不合并，恒为独立产物）
    pub keep_individual_data: bool,
    /// 合成后保留每个问题的中间截图文件
    pub keep_individual_visualization: bool,
    /// 输出目录覆盖（为空时使用配置中的目录）
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            id: 0,
            kind: ExportKind::Question,
            with_data: true,
            with_visualization: true,
            data_format: DataFormat::Xlsx,
            visualization_format: VisualizationFormat::Png,
            keep_individual_data: true,
            keep_individual_visualization: false,
            output_dir: None,
        }
    }
}

impl ExportRequest {
    /// 从环境变量构建导出请求
    ///
    /// `EXPORT_ID` 必填；格式类变量经 `FromStr` 校验，非法值立即返回
    /// 校验错误，不做任何网络或浏览器操作。
    pub fn from_env() -> Result<Self> {
        let default = Self::default();

        let id = std::env::var("EXPORT_ID")
            .map_err(|_| ExportError::validation("缺少环境变量 EXPORT_ID"))?
            .parse::<u64>()
            .map_err(|_| ExportError::validation("EXPORT_ID 必须是正整数"))?;

        let kind = match std::env::var("EXPORT_KIND") {
            Ok(value) => ExportKind::from_str(&value)?,
            Err(_) => default.kind,
        };
        let data_format = match std::env::var("DATA_FORMAT") {
            Ok(value) => DataFormat::from_str(&value)?,
            Err(_) => default.data_format,
        };
        let visualization_format = match std::env::var("VISUALIZATION_FORMAT") {
            Ok(value) => VisualizationFormat::from_str(&value)?,
            Err(_) => default.visualization_format,
        };

        Ok(Self {
            id,
            kind,
            with_data: env_flag("WITH_DATA", default.with_data),
            with_visualization: env_flag("WITH_VISUALIZATION", default.with_visualization),
            data_format,
            visualization_format,
            keep_individual_data: env_flag("KEEP_INDIVIDUAL_DATA", default.keep_individual_data),
            keep_individual_visualization: env_flag(
                "KEEP_INDIVIDUAL_VISUALIZATION",
                default.keep_individual_visualization,
            ),
            output_dir: std::env::var("EXPORT_OUTPUT_DIR").ok().map(PathBuf::from),
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
