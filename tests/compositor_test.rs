use image::{DynamicImage, RgbImage};
use metabase_exporter::fonts;
use metabase_exporter::models::DashboardInfo;
use metabase_exporter::services::compositor::{build_document, remove_transients};

fn chart(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([240, 240, 240])))
}

fn render_to_bytes(document: genpdf::Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    document.render(&mut bytes).expect("渲染文档失败");
    bytes
}

/// 统计渲染结果中的页面对象个数（`/Type/Page`，排除根节点 `/Type/Pages`）
///
/// lopdf 输出紧凑字典，类型键与值之间没有空格。
fn count_pages(bytes: &[u8]) -> usize {
    let marker = b"/Type/Page";
    bytes
        .windows(marker.len() + 1)
        .filter(|window| window.starts_with(marker) && window[marker.len()] != b's')
        .count()
}

#[test]
fn test_document_has_landing_page_plus_one_per_question() {
    if !fonts::fonts_available() {
        eprintln!("未找到字体目录，跳过渲染断言");
        return;
    }

    let dashboard = DashboardInfo {
        name: "销售总览".to_string(),
        description: Some("每周销售指标".to_string()),
    };
    let pages = vec![
        ("周销售额".to_string(), chart(400, 300)),
        ("客户增长".to_string(), chart(400, 300)),
        ("退货率".to_string(), chart(380, 280)),
    ];

    let family = fonts::default_font_family(None).expect("加载字体失败");
    let document = build_document(&dashboard, pages, family).expect("装配文档失败");
    let bytes = render_to_bytes(document);

    assert!(!bytes.is_empty());
    // 1 落地页 + 3 标题页
    assert_eq!(count_pages(&bytes), 4);
}

#[test]
fn test_document_without_description_still_renders() {
    if !fonts::fonts_available() {
        eprintln!("未找到字体目录，跳过渲染断言");
        return;
    }

    let dashboard = DashboardInfo {
        name: "无描述仪表盘".to_string(),
        description: None,
    };
    let pages = vec![("唯一问题".to_string(), chart(320, 240))];

    let family = fonts::default_font_family(None).expect("加载字体失败");
    let document = build_document(&dashboard, pages, family).expect("装配文档失败");
    let bytes = render_to_bytes(document);

    assert_eq!(count_pages(&bytes), 2);
}

#[test]
fn test_oversized_chart_is_scaled_not_rejected() {
    if !fonts::fonts_available() {
        eprintln!("未找到字体目录，跳过渲染断言");
        return;
    }

    let dashboard = DashboardInfo {
        name: "混合尺寸".to_string(),
        description: None,
    };
    // 第二张图比第一张大，必须缩小适配而不是溢出报错
    let pages = vec![
        ("小图".to_string(), chart(300, 200)),
        ("大图".to_string(), chart(900, 700)),
    ];

    let family = fonts::default_font_family(None).expect("加载字体失败");
    let document = build_document(&dashboard, pages, family).expect("装配文档失败");
    let bytes = render_to_bytes(document);

    assert_eq!(count_pages(&bytes), 3);
}

#[test]
fn test_empty_page_list_is_composition_error() {
    if !fonts::fonts_available() {
        eprintln!("未找到字体目录，跳过渲染断言");
        return;
    }

    let dashboard = DashboardInfo {
        name: "空仪表盘".to_string(),
        description: None,
    };

    let family = fonts::default_font_family(None).expect("加载字体失败");
    // 空列表由上层短路处理；装配函数本身拒绝空输入
    assert!(build_document(&dashboard, Vec::new(), family).is_err());
}

#[test]
fn test_remove_transients_deletes_files() {
    let dir = std::env::temp_dir();
    let paths: Vec<_> = (0..3)
        .map(|i| dir.join(format!("metabase_exporter_transient_{}_{}.png", std::process::id(), i)))
        .collect();
    for path in &paths {
        std::fs::write(path, b"fake image").expect("写入临时文件失败");
    }

    remove_transients(&paths);

    for path in &paths {
        assert!(!path.exists(), "中间文件应当被删除: {}", path.display());
    }
}

#[test]
fn test_remove_transients_tolerates_missing_files() {
    let missing = vec![std::env::temp_dir().join("metabase_exporter_never_existed.png")];
    // 不存在的文件只告警，不 panic
    remove_transients(&missing);
}
