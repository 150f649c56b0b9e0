//! PDF 字体加载
//!
//! 合成文档需要一套 TTF 字体族。查找顺序：
//! 1. `METABASE_EXPORTER_FONTS_DIR` 环境变量（或配置中的 fonts_dir）
//! 2. 随仓库分发的 `assets/fonts/`（Roboto 四件套，见目录内 README）
//! 3. 系统 DejaVu 字体目录（常见 Linux 发行版自带）

use std::path::{Path, PathBuf};

use genpdf::fonts::{self, FontData, FontFamily};

use crate::error::{ExportError, Result};

/// 字体目录环境变量
pub const FONTS_DIR_ENV: &str = "METABASE_EXPORTER_FONTS_DIR";

/// 随仓库分发的字体族名称
pub const BUNDLED_FONT_FAMILY_NAME: &str = "Roboto";

const ROBOTO_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const DEJAVU_DIR: &str = "/usr/share/fonts/truetype/dejavu";

const DEJAVU_FILES: &[&str] = &[
    "DejaVuSans.ttf",
    "DejaVuSans-Bold.ttf",
    "DejaVuSans-Oblique.ttf",
    "DejaVuSans-BoldOblique.ttf",
];

fn bundled_font_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn files_present(dir: &Path, files: &[&str]) -> bool {
    files.iter().all(|name| dir.join(name).is_file())
}

/// 解析默认字体族
///
/// `override_dir` 优先于环境变量与内置目录。
pub fn default_font_family(override_dir: Option<&Path>) -> Result<FontFamily<FontData>> {
    if let Some(dir) = override_dir {
        return family_from_dir(dir);
    }
    if let Ok(dir) = std::env::var(FONTS_DIR_ENV) {
        return family_from_dir(Path::new(&dir));
    }

    let bundled = bundled_font_directory();
    if files_present(&bundled, ROBOTO_FILES) {
        return roboto_family(&bundled);
    }

    let dejavu = Path::new(DEJAVU_DIR);
    if files_present(dejavu, DEJAVU_FILES) {
        return dejavu_family(dejavu);
    }

    Err(ExportError::composition(format!(
        "未找到可用的 TTF 字体：请设置 {} 或在 {} 放置 Roboto 字体文件",
        FONTS_DIR_ENV,
        bundled.display()
    )))
}

/// 指示是否存在可用的字体目录（供测试在无字体环境下跳过渲染断言）
pub fn fonts_available() -> bool {
    if let Ok(dir) = std::env::var(FONTS_DIR_ENV) {
        let dir = PathBuf::from(dir);
        return files_present(&dir, ROBOTO_FILES) || files_present(&dir, DEJAVU_FILES);
    }
    files_present(&bundled_font_directory(), ROBOTO_FILES)
        || files_present(Path::new(DEJAVU_DIR), DEJAVU_FILES)
}

fn family_from_dir(dir: &Path) -> Result<FontFamily<FontData>> {
    if files_present(dir, ROBOTO_FILES) {
        return roboto_family(dir);
    }
    if files_present(dir, DEJAVU_FILES) {
        return dejavu_family(dir);
    }
    Err(ExportError::composition(format!(
        "字体目录 {} 中既没有 Roboto 也没有 DejaVu 字体文件",
        dir.display()
    )))
}

fn roboto_family(dir: &Path) -> Result<FontFamily<FontData>> {
    fonts::from_files(dir, BUNDLED_FONT_FAMILY_NAME, None).map_err(|e| {
        ExportError::composition_source(
            format!("从 {} 加载 Roboto 字体族", dir.display()),
            e,
        )
    })
}

fn dejavu_family(dir: &Path) -> Result<FontFamily<FontData>> {
    // DejaVu 的文件命名不符合 genpdf from_files 的约定，逐个加载
    Ok(FontFamily {
        regular: load_font(&dir.join("DejaVuSans.ttf"))?,
        bold: load_font(&dir.join("DejaVuSans-Bold.ttf"))?,
        italic: load_font(&dir.join("DejaVuSans-Oblique.ttf"))?,
        bold_italic: load_font(&dir.join("DejaVuSans-BoldOblique.ttf"))?,
    })
}

fn load_font(path: &Path) -> Result<FontData> {
    let bytes =
        std::fs::read(path).map_err(|e| ExportError::file(path.display().to_string(), e))?;
    FontData::new(bytes, None)
        .map_err(|e| ExportError::composition_source(format!("加载字体 {}", path.display()), e))
}
