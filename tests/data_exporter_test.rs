use futures::stream;
use metabase_exporter::services::data_exporter::write_body_to_file;
use metabase_exporter::ExportError;

fn temp_path(suffix: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "metabase_exporter_stream_{}_{}",
        std::process::id(),
        suffix
    ))
}

#[tokio::test]
async fn test_streamed_chunks_written_exactly() {
    // 多块输入，包含空块：落盘字节必须是各块的原样拼接
    let chunks: Vec<Result<Vec<u8>, ExportError>> = vec![
        Ok(b"id,name\n".to_vec()),
        Ok(Vec::new()),
        Ok(b"1,foo\n".to_vec()),
        Ok(b"2,bar\n".to_vec()),
    ];
    let path = temp_path("exact.csv");

    write_body_to_file(stream::iter(chunks), &path)
        .await
        .expect("写入失败");

    let written = std::fs::read(&path).expect("读取落盘文件失败");
    assert_eq!(written, b"id,name\n1,foo\n2,bar\n");

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_stream_error_aborts_write() {
    let chunks: Vec<Result<Vec<u8>, ExportError>> = vec![
        Ok(b"partial".to_vec()),
        Err(ExportError::validation("流中断")),
        Ok(b"never written".to_vec()),
    ];
    let path = temp_path("aborted.csv");

    let result = write_body_to_file(stream::iter(chunks), &path).await;
    assert!(matches!(result, Err(ExportError::Validation { .. })));

    // 失败块之后的内容不得写入（出错前的部分内容可能残留，调用方自行处置）
    let written = std::fs::read(&path).expect("读取落盘文件失败");
    assert!(!written.windows(b"never written".len()).any(|w| w == b"never written"));

    std::fs::remove_file(&path).ok();
}

#[tokio::test]
async fn test_empty_stream_writes_empty_file() {
    let chunks: Vec<Result<Vec<u8>, ExportError>> = Vec::new();
    let path = temp_path("empty.csv");

    write_body_to_file(stream::iter(chunks), &path)
        .await
        .expect("写入失败");

    let written = std::fs::read(&path).expect("读取落盘文件失败");
    assert!(written.is_empty());

    std::fs::remove_file(&path).ok();
}
