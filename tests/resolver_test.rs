use metabase_exporter::services::resolver::parse_dashboard;
use metabase_exporter::ExportError;
use serde_json::json;

#[test]
fn test_parse_preserves_card_order_and_filters_non_questions() {
    // 3 个问题卡片 + 1 个文本卡片（无 card.id / card.name）
    let body = json!({
        "name": "销售总览",
        "description": "每周销售指标",
        "ordered_cards": [
            { "card": { "id": 11, "name": "周销售额" } },
            { "card": {} },
            { "card": { "id": 12, "name": "客户增长" } },
            { "card": { "id": 13, "name": "退货率" } }
        ]
    });

    let (questions, info) = parse_dashboard(7, &body).unwrap();

    assert_eq!(questions.len(), 3);
    assert_eq!(
        questions.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![11, 12, 13]
    );
    assert_eq!(questions[0].title, "周销售额");
    assert_eq!(info.name, "销售总览");
    assert_eq!(info.description.as_deref(), Some("每周销售指标"));
}

#[test]
fn test_parse_accepts_dashcards_field() {
    let body = json!({
        "name": "新版仪表盘",
        "dashcards": [
            { "card": { "id": 5, "name": "唯一卡片" } }
        ]
    });

    let (questions, info) = parse_dashboard(1, &body).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 5);
    assert_eq!(info.description, None);
}

#[test]
fn test_parse_skips_card_missing_id_or_name() {
    let body = json!({
        "name": "混合仪表盘",
        "ordered_cards": [
            { "card": { "name": "只有名字" } },
            { "card": { "id": 9 } },
            { "card": { "id": 10, "name": "完整卡片" } },
            { "note": "没有 card 字段的条目" }
        ]
    });

    let (questions, _) = parse_dashboard(2, &body).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 10);
}

#[test]
fn test_parse_empty_card_list_is_not_an_error() {
    let body = json!({
        "name": "空仪表盘",
        "ordered_cards": []
    });

    let (questions, _) = parse_dashboard(3, &body).unwrap();
    assert!(questions.is_empty());
}

#[test]
fn test_parse_missing_name_is_resolution_error() {
    let body = json!({ "ordered_cards": [] });

    let err = parse_dashboard(4, &body).expect_err("缺少 name 应当报解析错误");
    assert!(matches!(
        err,
        ExportError::Resolution { dashboard_id: 4, .. }
    ));
}

#[test]
fn test_parse_missing_card_array_is_resolution_error() {
    let body = json!({ "name": "残缺仪表盘" });

    let err = parse_dashboard(5, &body).expect_err("缺少卡片数组应当报解析错误");
    assert!(matches!(
        err,
        ExportError::Resolution { dashboard_id: 5, .. }
    ));
}
