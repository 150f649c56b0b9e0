use metabase_exporter::models::{
    DataFormat, ExportKind, ExportRequest, VisualizationFormat,
};
use metabase_exporter::utils::logging;
use metabase_exporter::{Config, Exporter, ExportError};

#[tokio::test]
#[ignore] // 默认忽略，需要本地 Metabase 实例：cargo test -- --ignored
async fn test_export_question_data_and_screenshot() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    let output_dir = config.output_dir.clone();

    // 建立 API 会话和浏览器会话
    let mut exporter = Exporter::connect(config).await.expect("建立会话失败");

    // 注意：请根据实际情况修改问题 ID
    let request = ExportRequest {
        id: 1,
        kind: ExportKind::Question,
        with_data: true,
        with_visualization: true,
        data_format: DataFormat::Csv,
        visualization_format: VisualizationFormat::Png,
        ..Default::default()
    };

    let result = exporter.export(&request).await;
    exporter.close().await.expect("回收浏览器失败");
    result.expect("导出问题失败");

    // 数据文件和截图都应当落盘
    let entries: Vec<_> = std::fs::read_dir(&output_dir)
        .expect("读取输出目录失败")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(entries.iter().any(|n| n.starts_with("query_result_1_") && n.ends_with(".csv")));
    assert!(entries.iter().any(|n| n.starts_with("question_1_") && n.ends_with(".png")));
}

#[tokio::test]
#[ignore]
async fn test_export_dashboard_to_single_pdf() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    let output_dir = config.output_dir.clone();

    let mut exporter = Exporter::connect(config).await.expect("建立会话失败");

    // 注意：请根据实际情况修改仪表盘 ID
    let request = ExportRequest {
        id: 1,
        kind: ExportKind::Dashboard,
        with_data: false,
        with_visualization: true,
        visualization_format: VisualizationFormat::Jpg,
        keep_individual_visualization: false,
        ..Default::default()
    };

    let result = exporter.export(&request).await;
    exporter.close().await.expect("回收浏览器失败");
    result.expect("导出仪表盘失败");

    let entries: Vec<_> = std::fs::read_dir(&output_dir)
        .expect("读取输出目录失败")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    // 合并为单个 PDF，中间截图不保留
    assert!(entries.iter().any(|n| n.starts_with("dashboard_1_") && n.ends_with(".pdf")));
    assert!(!entries.iter().any(|n| n.starts_with("question_") && n.ends_with(".jpg")));
}

#[tokio::test]
#[ignore]
async fn test_invalid_credentials_fail_at_connect() {
    // 初始化日志
    logging::init();

    let config = Config {
        metabase_password: "definitely-wrong-password".to_string(),
        ..Config::from_env()
    };

    let err = match Exporter::connect(config).await {
        Ok(exporter) => {
            exporter.close().await.ok();
            panic!("错误凭据不应建立会话");
        }
        Err(err) => err,
    };

    assert!(matches!(err, ExportError::Authentication { .. }));
}
