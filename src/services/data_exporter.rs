//! 数据导出器 - 业务能力层
//!
//! 把问题的查询结果按请求格式流式下载到磁盘。

use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::api::MetabaseClient;
use crate::error::{ExportError, Result};
use crate::models::DataFormat;
use crate::utils::naming;

/// 数据导出器
pub struct DataExporter {
    output_dir: PathBuf,
}

impl DataExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 下载问题的查询结果，返回写入的文件路径
    ///
    /// 响应体逐块写盘，内存占用与结果大小无关。
    pub async fn fetch(
        &self,
        client: &MetabaseClient,
        question_id: u64,
        format: DataFormat,
    ) -> Result<PathBuf> {
        let response = client.query_export(question_id, format).await?;

        let path = self
            .output_dir
            .join(naming::query_result_filename(question_id, format));
        write_body_to_file(response.bytes_stream(), &path).await?;

        info!("✓ 查询数据已保存: {}", path.display());
        Ok(path)
    }
}

/// 把字节流按块序逐块写入文件
///
/// 写入的字节即各块的原样拼接，不截断不重复；任一块读取失败
/// 立即中止并返回错误。
pub async fn write_body_to_file<S, B, E>(stream: S, path: &Path) -> Result<()>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<ExportError>,
{
    let mut file = File::create(path)
        .await
        .map_err(|e| ExportError::file(path.display().to_string(), e))?;

    futures::pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        file.write_all(chunk.as_ref())
            .await
            .map_err(|e| ExportError::file(path.display().to_string(), e))?;
    }

    file.flush()
        .await
        .map_err(|e| ExportError::file(path.display().to_string(), e))?;
    Ok(())
}
