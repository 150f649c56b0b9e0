//! 可视化捕获器 - 业务能力层
//!
//! 导航到问题/仪表盘卡片页面，等待图表渲染，截取视口截图并裁剪到
//! 图表元素的包围盒，存为无透明通道的栅格图像。

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::infrastructure::BrowserSession;
use crate::models::{ElementRect, PageKind, VisualizationFormat};
use crate::utils::naming;

/// 图表渲染容器元素
pub const CARD_SELECTOR: &str = ".CardVisualization";

/// 可视化捕获器
///
/// 自身无状态，跨调用只复用传入的浏览器会话；会话以 `&mut` 借用，
/// 同一会话上的捕获天然串行。
pub struct VisualizationCapturer {
    output_dir: PathBuf,
}

impl VisualizationCapturer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 捕获指定实体的可视化，返回写入的图像路径
    ///
    /// 流程：导航 → 等待元素出现并稳定 → 读取包围盒 → 视口截图 →
    /// 裁剪 → 转 RGB → 保存。布局在等待结束后不再二次测量。
    pub async fn capture(
        &self,
        session: &mut BrowserSession,
        base_url: &str,
        id: u64,
        format: VisualizationFormat,
        page_kind: PageKind,
    ) -> Result<PathBuf> {
        if !format.is_raster() {
            return Err(ExportError::validation(
                "捕获输出只支持栅格格式 (png|jpg)",
            ));
        }

        let url = format!("{}/{}/{}", base_url, page_kind.path_segment(), id);
        session.navigate(&url).await?;
        session.wait_for_render(CARD_SELECTOR).await?;

        let rect = session.element_rect(CARD_SELECTOR).await?;
        debug!(
            "图表包围盒: x={:.1}, y={:.1}, w={:.1}, h={:.1}",
            rect.x, rect.y, rect.width, rect.height
        );

        let screenshot = session.screenshot_viewport().await?;
        let full = image::load_from_memory(&screenshot)?;
        let cropped = crop_to_rect(&full, &rect);

        // 合成文档不处理透明度，统一转为 RGB
        let flattened = DynamicImage::ImageRgb8(cropped.to_rgb8());

        let path = self.output_dir.join(naming::question_filename(id, format));
        save_image(&flattened, &path)?;

        info!("✓ 可视化已保存: {}", path.display());
        Ok(path)
    }
}

/// 把图像裁剪到元素矩形，坐标取整并收拢到截图边界内
pub fn crop_to_rect(image: &DynamicImage, rect: &ElementRect) -> DynamicImage {
    let (img_w, img_h) = image.dimensions();

    let x = (rect.x.max(0.0).round() as u32).min(img_w.saturating_sub(1));
    let y = (rect.y.max(0.0).round() as u32).min(img_h.saturating_sub(1));
    let w = (rect.width.max(0.0).round() as u32).max(1).min(img_w - x);
    let h = (rect.height.max(0.0).round() as u32).max(1).min(img_h - y);

    image.crop_imm(x, y, w, h)
}

fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .map_err(|e| ExportError::file(path.display().to_string(), e))
}
