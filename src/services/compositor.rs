//! 仪表盘合成器 - 业务能力层
//!
//! 把逐卡片捕获的图表图像装配为单份多页 PDF：第 0 页为落地页
//! （仪表盘名称与描述），其后每页为一个问题的标题栏加裁剪图表。
//! 中间截图文件默认在合成后删除。

use std::path::{Path, PathBuf};

use genpdf::elements::{Break, Image, PageBreak, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{Alignment, Element, Margins, Mm, Scale, SimplePageDecorator, Size};
use image::{DynamicImage, GenericImageView};
use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::fonts;
use crate::infrastructure::BrowserSession;
use crate::models::{DashboardInfo, PageKind, QuestionRef, VisualizationFormat};
use crate::services::capturer::VisualizationCapturer;
use crate::utils::naming;

/// 图像像素到页面尺寸的换算 DPI
const RASTER_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// 页边距
const PAGE_MARGIN_MM: f64 = 10.0;
/// 标题栏高度（问题标题所在的区域）
const CAPTION_BAND_MM: f64 = 16.0;

/// 落地页主标题字号
const LANDING_TITLE_FONT_SIZE: u8 = 20;
/// 落地页描述与问题标题字号
const BODY_FONT_SIZE: u8 = 12;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn px_to_mm(px: u32) -> f64 {
    MM_PER_INCH * (px as f64) / RASTER_DPI
}

/// 仪表盘合成器
pub struct DashboardCompositor {
    output_dir: PathBuf,
    fonts_dir: Option<PathBuf>,
}

impl DashboardCompositor {
    pub fn new(output_dir: impl Into<PathBuf>, fonts_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            fonts_dir,
        }
    }

    /// 逐卡片捕获并合成仪表盘文档，返回文档路径
    ///
    /// 问题列表为空时不产出文档，也不视为错误。除非
    /// `keep_individual`，合成后删除全部中间截图文件。
    pub async fn compose(
        &self,
        capturer: &VisualizationCapturer,
        session: &mut BrowserSession,
        base_url: &str,
        dashboard_id: u64,
        dashboard: &DashboardInfo,
        questions: &[QuestionRef],
        raster_format: VisualizationFormat,
        keep_individual: bool,
    ) -> Result<Option<PathBuf>> {
        if questions.is_empty() {
            info!("仪表盘没有可导出的问题卡片，跳过合成");
            return Ok(None);
        }

        // 1. 按布局顺序逐个捕获；任一失败即中止整轮导出，不做部分成功
        let mut transients: Vec<PathBuf> = Vec::with_capacity(questions.len());
        for question in questions {
            info!("📸 捕获问题 {} 「{}」...", question.id, question.title);
            let path = capturer
                .capture(
                    session,
                    base_url,
                    question.id,
                    raster_format,
                    PageKind::Question,
                )
                .await?;
            transients.push(path);
        }

        // 2. 解码并装配文档
        let mut pages = Vec::with_capacity(questions.len());
        for (question, path) in questions.iter().zip(&transients) {
            pages.push((question.title.clone(), decode_image(path)?));
        }

        let family = fonts::default_font_family(self.fonts_dir.as_deref())?;
        let document = build_document(dashboard, pages, family)?;

        let out_path = self.output_dir.join(naming::dashboard_filename(dashboard_id));
        document
            .render_to_file(&out_path)
            .map_err(|e| ExportError::composition_source("渲染仪表盘文档", e))?;
        info!("✓ 仪表盘文档已保存: {}", out_path.display());

        // 3. 清理中间文件
        if !keep_individual {
            remove_transients(&transients);
        }

        Ok(Some(out_path))
    }

    /// 把单张图表图像渲染为单页 PDF（问题导出的 pdf 格式路径）
    pub fn render_single(&self, image: DynamicImage, out_path: &Path) -> Result<()> {
        let family = fonts::default_font_family(self.fonts_dir.as_deref())?;
        let mut document = genpdf::Document::new(family);

        let (px_w, px_h) = image.dimensions();
        let paper_w = px_to_mm(px_w) + 2.0 * PAGE_MARGIN_MM;
        let paper_h = px_to_mm(px_h) + 2.0 * PAGE_MARGIN_MM;
        document.set_paper_size(Size::new(mm_from_f64(paper_w), mm_from_f64(paper_h)));

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::all(mm_from_f64(PAGE_MARGIN_MM)));
        document.set_page_decorator(decorator);

        document.push(page_image(image, paper_w, paper_h, 0.0)?);

        document
            .render_to_file(out_path)
            .map_err(|e| ExportError::composition_source("渲染单页文档", e))
    }
}

/// 装配完整的仪表盘文档
///
/// 页面序列：[落地页, 标题页 1, …, 标题页 N]。纸张尺寸取第一张
/// 图表在固定 DPI 下的自然尺寸加标题栏与页边距；后续图表按需
/// 等比缩小以适配版面，从不放大。
pub fn build_document(
    dashboard: &DashboardInfo,
    pages: Vec<(String, DynamicImage)>,
    family: FontFamily<FontData>,
) -> Result<genpdf::Document> {
    let first = pages
        .first()
        .ok_or_else(|| ExportError::composition("没有可合成的页面"))?;

    let (px_w, px_h) = first.1.dimensions();
    let paper_w = px_to_mm(px_w) + 2.0 * PAGE_MARGIN_MM;
    let paper_h = px_to_mm(px_h) + CAPTION_BAND_MM + 2.0 * PAGE_MARGIN_MM;

    let mut document = genpdf::Document::new(family);
    document.set_title(&dashboard.name);
    document.set_paper_size(Size::new(mm_from_f64(paper_w), mm_from_f64(paper_h)));

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::all(mm_from_f64(PAGE_MARGIN_MM)));
    document.set_page_decorator(decorator);

    // 落地页：仪表盘名称居中，描述在其下方
    document.push(Break::new(1.0));
    document.push(
        Paragraph::new(dashboard.name.as_str())
            .aligned(Alignment::Center)
            .styled(Style::new().bold().with_font_size(LANDING_TITLE_FONT_SIZE)),
    );
    if let Some(description) = &dashboard.description {
        document.push(Break::new(1.0));
        document.push(
            Paragraph::new(description.as_str())
                .aligned(Alignment::Center)
                .styled(Style::new().with_font_size(BODY_FONT_SIZE)),
        );
    }

    // 每个问题一页：左对齐标题栏 + 图表
    for (title, image) in pages {
        document.push(PageBreak::new());
        document.push(
            Paragraph::new(title.as_str())
                .aligned(Alignment::Left)
                .styled(Style::new().bold().with_font_size(BODY_FONT_SIZE)),
        );
        document.push(Break::new(0.5));
        document.push(page_image(image, paper_w, paper_h, CAPTION_BAND_MM)?);
    }

    Ok(document)
}

/// 构建适配版面的图表元素
fn page_image(
    image: DynamicImage,
    paper_w: f64,
    paper_h: f64,
    caption_band: f64,
) -> Result<Image> {
    let (px_w, px_h) = image.dimensions();
    let natural_w = px_to_mm(px_w);
    let natural_h = px_to_mm(px_h);

    let avail_w = paper_w - 2.0 * PAGE_MARGIN_MM;
    let avail_h = paper_h - caption_band - 2.0 * PAGE_MARGIN_MM;

    let mut element = Image::from_dynamic_image(image)
        .map_err(|e| ExportError::composition_source("构建图表元素", e))?;
    element.set_alignment(Alignment::Center);

    // 只缩小，不放大
    let scale = (avail_w / natural_w).min(avail_h / natural_h).min(1.0);
    if scale < 1.0 {
        element.set_scale(Scale::new(scale, scale));
    }

    Ok(element)
}

/// 解码中间截图文件
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| {
        ExportError::composition_source(format!("解码图像 {}", path.display()), e)
    })
}

/// 删除中间截图文件（尽力而为，失败只告警）
pub fn remove_transients(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("⚠️ 删除中间文件失败 ({}): {}", path.display(), e);
        }
    }
}
