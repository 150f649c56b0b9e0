use std::str::FromStr;

use metabase_exporter::models::{
    DataFormat, ExportKind, ExportRequest, PageKind, VisualizationFormat,
};
use metabase_exporter::orchestrator::{requested_work, validate};
use metabase_exporter::ExportError;

#[test]
fn test_data_format_parse() {
    assert_eq!(DataFormat::from_str("csv").unwrap(), DataFormat::Csv);
    assert_eq!(DataFormat::from_str("json").unwrap(), DataFormat::Json);
    assert_eq!(DataFormat::from_str("xlsx").unwrap(), DataFormat::Xlsx);

    // 大小写敏感，与原始行为一致
    assert!(DataFormat::from_str("CSV").is_err());
    assert!(DataFormat::from_str("parquet").is_err());
}

#[test]
fn test_visualization_format_parse() {
    assert_eq!(
        VisualizationFormat::from_str("png").unwrap(),
        VisualizationFormat::Png
    );
    assert_eq!(
        VisualizationFormat::from_str("jpg").unwrap(),
        VisualizationFormat::Jpg
    );
    assert_eq!(
        VisualizationFormat::from_str("pdf").unwrap(),
        VisualizationFormat::Pdf
    );
    assert!(VisualizationFormat::from_str("gif").is_err());
}

#[test]
fn test_format_extensions() {
    assert_eq!(DataFormat::Xlsx.extension(), "xlsx");
    assert_eq!(VisualizationFormat::Jpg.extension(), "jpg");
    assert!(VisualizationFormat::Png.is_raster());
    assert!(VisualizationFormat::Jpg.is_raster());
    assert!(!VisualizationFormat::Pdf.is_raster());
}

#[test]
fn test_page_kind_path() {
    assert_eq!(PageKind::Question.path_segment(), "question");
    assert_eq!(PageKind::DashboardCard.path_segment(), "dashboard");
}

#[test]
fn test_dashboard_rejects_pdf_per_card() {
    let request = ExportRequest {
        id: 7,
        kind: ExportKind::Dashboard,
        visualization_format: VisualizationFormat::Pdf,
        ..Default::default()
    };

    let err = validate(&request).expect_err("仪表盘 + pdf 应当被拒绝");
    assert!(matches!(err, ExportError::Validation { .. }));
}

#[test]
fn test_dashboard_accepts_raster_per_card() {
    for format in [VisualizationFormat::Png, VisualizationFormat::Jpg] {
        let request = ExportRequest {
            id: 7,
            kind: ExportKind::Dashboard,
            visualization_format: format,
            ..Default::default()
        };
        assert!(validate(&request).is_ok());
    }
}

#[test]
fn test_question_accepts_pdf() {
    let request = ExportRequest {
        id: 42,
        kind: ExportKind::Question,
        visualization_format: VisualizationFormat::Pdf,
        ..Default::default()
    };
    assert!(validate(&request).is_ok());
}

#[test]
fn test_pdf_not_requested_is_not_validated_away() {
    // 未请求可视化时，pdf 格式字段不触发校验错误
    let request = ExportRequest {
        id: 7,
        kind: ExportKind::Dashboard,
        with_visualization: false,
        visualization_format: VisualizationFormat::Pdf,
        ..Default::default()
    };
    assert!(validate(&request).is_ok());
}

#[test]
fn test_requested_work() {
    let none = ExportRequest {
        with_data: false,
        with_visualization: false,
        ..Default::default()
    };
    assert!(!requested_work(&none));

    let data_only = ExportRequest {
        with_data: true,
        with_visualization: false,
        ..Default::default()
    };
    assert!(requested_work(&data_only));
}

#[test]
fn test_kind_parse() {
    assert_eq!(ExportKind::from_str("question").unwrap(), ExportKind::Question);
    assert_eq!(
        ExportKind::from_str("dashboard").unwrap(),
        ExportKind::Dashboard
    );
    assert!(ExportKind::from_str("card").is_err());
}
