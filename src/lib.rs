//! # Metabase Exporter
//!
//! 一个用于批量导出 Metabase 问题与仪表盘的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `BrowserSession` - 唯一的 page owner，提供导航/等待/测量/截图能力
//! - `api::MetabaseClient` - REST 会话，提供元数据与查询导出能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只处理一件事
//! - `DashboardResolver` - 仪表盘 → 问题卡片列表
//! - `DataExporter` - 查询结果流式落盘
//! - `VisualizationCapturer` - 截图/裁剪单个图表
//! - `DashboardCompositor` - 多页 PDF 装配与中间文件清理
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/` - 校验请求、建立会话、串联导出流程
//!
//! ## 导出流程
//!
//! ```text
//! Exporter::connect (API 会话 + 浏览器登录，一次建立)
//!     ↓
//! Exporter::export
//!     ├── question:  fetch_data / capture
//!     └── dashboard: resolve → 逐问题 fetch_data → compose(逐问题 capture → 单份 PDF)
//! ```

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod fonts;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use api::MetabaseClient;
pub use browser::launch_headless_browser;
pub use config::Config;
pub use error::{ExportError, Result};
pub use infrastructure::BrowserSession;
pub use models::{
    DashboardInfo, DataFormat, ExportKind, ExportRequest, PageKind, QuestionRef,
    VisualizationFormat,
};
pub use orchestrator::Exporter;
pub use services::{
    DashboardCompositor, DashboardResolver, DataExporter, VisualizationCapturer,
};
