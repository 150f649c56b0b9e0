//! 导出编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，持有两条会话（REST 客户端与浏览器），
//! 校验请求参数，并把单问题/仪表盘两条导出流程串起来。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::Exporter (校验 + 分发)
//!     ↓
//! services (能力层：resolver / data_exporter / capturer / compositor)
//!     ↓
//! api::MetabaseClient + infrastructure::BrowserSession (两条会话)
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::api::MetabaseClient;
use crate::browser;
use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::infrastructure::BrowserSession;
use crate::models::{ExportKind, ExportRequest, PageKind, VisualizationFormat};
use crate::services::{
    compositor, DashboardCompositor, DashboardResolver, DataExporter, VisualizationCapturer,
};
use crate::utils::naming;

/// 导出编排器
///
/// 两条会话在构造时一并建立，整个实例生命周期内复用；中途失败
/// 不做静默重连。浏览器进程由本实例独占，用完必须调用 [`close`]
/// 回收，否则进程泄漏。
///
/// [`close`]: Exporter::close
pub struct Exporter {
    config: Config,
    client: MetabaseClient,
    browser: Browser,
    session: BrowserSession,
}

impl Exporter {
    /// 建立 API 会话与已登录的浏览器会话
    ///
    /// 任一条腿的凭据被拒绝都会中止构造，不返回降级的部分会话。
    pub async fn connect(config: Config) -> Result<Self> {
        log_startup(&config);

        let base_url = config.base_url();

        // API 腿
        let client = MetabaseClient::authenticate(
            &base_url,
            &config.metabase_username,
            &config.metabase_password,
        )
        .await?;

        // 浏览器腿
        let (mut browser, page) = browser::launch_headless_browser(&config, &base_url).await?;
        let mut session = BrowserSession::new(
            page,
            Duration::from_secs(config.login_timeout_secs),
            Duration::from_secs(config.render_timeout_secs),
            Duration::from_millis(config.settle_millis),
        );

        if let Err(e) = session
            .login(&config.metabase_username, &config.metabase_password)
            .await
        {
            // 登录失败时先回收浏览器进程再报错
            let _ = browser.close().await;
            let _ = browser.wait().await;
            return Err(e);
        }

        Ok(Self {
            config,
            client,
            browser,
            session,
        })
    }

    /// 执行一次导出请求
    ///
    /// 先做参数校验；既不要数据也不要可视化的请求直接返回，
    /// 不发起任何网络或浏览器调用。
    pub async fn export(&mut self, request: &ExportRequest) -> Result<()> {
        validate(request)?;

        if !requested_work(request) {
            info!("未请求任何导出内容，直接返回");
            return Ok(());
        }

        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.output_dir.clone());
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| ExportError::file(output_dir.display().to_string(), e))?;

        match request.kind {
            ExportKind::Question => self.export_question(request, &output_dir).await,
            ExportKind::Dashboard => self.export_dashboard(request, &output_dir).await,
        }
    }

    /// 关闭浏览器会话，回收浏览器进程
    pub async fn close(mut self) -> Result<()> {
        info!("🧹 关闭浏览器会话...");
        self.browser.close().await?;
        self.browser
            .wait()
            .await
            .map_err(|e| ExportError::browser("等待浏览器进程退出", e))?;
        Ok(())
    }

    /// 单问题导出：数据和/或可视化
    async fn export_question(&mut self, request: &ExportRequest, output_dir: &Path) -> Result<()> {
        info!("📋 导出问题 {} ...", request.id);
        let base_url = self.config.base_url();

        if request.with_data {
            let exporter = DataExporter::new(output_dir);
            exporter
                .fetch(&self.client, request.id, request.data_format)
                .await?;
        }

        if request.with_visualization {
            let capturer = VisualizationCapturer::new(output_dir);
            match request.visualization_format {
                VisualizationFormat::Pdf => {
                    // pdf 输出走合成路径：先捕获中间 PNG，再包装为单页文档
                    let transient = capturer
                        .capture(
                            &mut self.session,
                            &base_url,
                            request.id,
                            VisualizationFormat::Png,
                            PageKind::Question,
                        )
                        .await?;
                    let image = compositor::decode_image(&transient)?;

                    let out_path = output_dir.join(naming::question_filename(
                        request.id,
                        VisualizationFormat::Pdf,
                    ));
                    let comp =
                        DashboardCompositor::new(output_dir, self.config.fonts_dir.clone());
                    comp.render_single(image, &out_path)?;
                    compositor::remove_transients(&[transient]);
                    info!("✓ 可视化已保存: {}", out_path.display());
                }
                _ => {
                    capturer
                        .capture(
                            &mut self.session,
                            &base_url,
                            request.id,
                            request.visualization_format,
                            PageKind::Question,
                        )
                        .await?;
                }
            }
        }

        info!("✅ 问题 {} 导出完成", request.id);
        Ok(())
    }

    /// 仪表盘导出：解析一次，逐问题取数，合成单份 PDF
    ///
    /// 仅支持问题汇总路径；导出仪表盘自身记录而不展开卡片不支持。
    async fn export_dashboard(&mut self, request: &ExportRequest, output_dir: &Path) -> Result<()> {
        info!("📊 导出仪表盘 {} ...", request.id);
        let base_url = self.config.base_url();

        let resolver = DashboardResolver::new();
        let (questions, dashboard) = resolver.resolve(&self.client, request.id).await?;

        if request.with_data {
            let exporter = DataExporter::new(output_dir);
            let mut data_files = Vec::with_capacity(questions.len());
            for question in &questions {
                let path = exporter
                    .fetch(&self.client, question.id, request.data_format)
                    .await?;
                data_files.push(path);
            }
            self.package_data_files(&data_files);
        }

        if request.with_visualization {
            let capturer = VisualizationCapturer::new(output_dir);
            let comp = DashboardCompositor::new(output_dir, self.config.fonts_dir.clone());
            let composed = comp
                .compose(
                    &capturer,
                    &mut self.session,
                    &base_url,
                    request.id,
                    &dashboard,
                    &questions,
                    request.visualization_format,
                    request.keep_individual_visualization,
                )
                .await?;

            if composed.is_none() {
                warn!("⚠️ 仪表盘 {} 没有问题卡片，未生成文档", request.id);
            }
        }

        info!("✅ 仪表盘 {} 导出完成", request.id);
        Ok(())
    }

    /// 预留：把多个数据文件合并打包为单个工作簿；目前不执行任何动作，
    /// 每个问题的数据保持为独立文件
    fn package_data_files(&self, _paths: &[PathBuf]) {}
}

/// 校验导出请求参数
///
/// 在任何网络或浏览器操作之前执行。格式与类型的成员合法性由
/// 枚举类型保证，这里只校验组合约束。
pub fn validate(request: &ExportRequest) -> Result<()> {
    if request.with_visualization
        && request.kind == ExportKind::Dashboard
        && !request.visualization_format.is_raster()
    {
        return Err(ExportError::validation(
            "仪表盘模式的逐卡片格式不支持 pdf (支持: png|jpg)；最终合成产物固定为 PDF",
        ));
    }
    Ok(())
}

/// 请求是否包含任何实际工作
pub fn requested_work(request: &ExportRequest) -> bool {
    request.with_data || request.with_visualization
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Metabase 导出器启动");
    info!("📡 目标服务: {}", config.base_url());
    info!(
        "🖥️ 视口: {}x{}",
        config.viewport_width, config.viewport_height
    );
    info!("{}", "=".repeat(60));
}
