//! Metabase API 客户端
//!
//! 封装所有与 Metabase REST API 的交互：会话创建、仪表盘元数据、
//! 查询结果导出。会话令牌在认证成功后保存在内存中，整个导出过程
//! 复用同一令牌；令牌中途过期会直接表现为授权失败，不做静默重试。

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::models::DataFormat;

/// 会话令牌请求头
const SESSION_HEADER: &str = "X-Metabase-Session";

/// Metabase API 客户端
pub struct MetabaseClient {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl MetabaseClient {
    /// 使用凭据创建会话并返回客户端
    ///
    /// 响应体缺少 `id` 字段即视为凭据无效，构造失败。
    pub async fn authenticate(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let endpoint = format!("{}/api/session", base_url);
        debug!("请求 API 会话: {}", endpoint);

        let http = reqwest::Client::new();
        let response = http
            .post(&endpoint)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ExportError::transport(endpoint.clone(), e))?;

        if !response.status().is_success() {
            return Err(ExportError::authentication(format!(
                "会话创建被拒绝，状态码 {}",
                response.status().as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ExportError::transport(endpoint.clone(), e))?;

        let session_token = body
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ExportError::authentication("Metabase 凭据无效"))?
            .to_string();

        info!("✅ API 会话创建成功");

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            session_token,
        })
    }

    /// 服务基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 获取仪表盘元数据
    ///
    /// 404 表示仪表盘不存在，映射为解析错误；其余非成功状态映射为
    /// 传输错误。
    pub async fn dashboard(&self, dashboard_id: u64) -> Result<Value> {
        let endpoint = format!("{}/api/dashboard/{}", self.base_url, dashboard_id);
        debug!("获取仪表盘元数据: {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
            .header(SESSION_HEADER, &self.session_token)
            .send()
            .await
            .map_err(|e| ExportError::transport(endpoint.clone(), e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ExportError::resolution(dashboard_id, "仪表盘不存在"));
        }
        if !status.is_success() {
            return Err(ExportError::transport_status(endpoint, status.as_u16()));
        }

        let body = response
            .json()
            .await
            .map_err(|e| ExportError::transport(endpoint, e))?;
        Ok(body)
    }

    /// 发起查询结果导出请求，返回可流式读取的响应
    ///
    /// 非成功状态码直接返回传输错误，不重试。
    pub async fn query_export(
        &self,
        question_id: u64,
        format: DataFormat,
    ) -> Result<reqwest::Response> {
        let endpoint = format!(
            "{}/api/card/{}/query/{}",
            self.base_url,
            question_id,
            format.extension()
        );
        debug!("导出查询结果: {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .header(SESSION_HEADER, &self.session_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ExportError::transport(endpoint.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::transport_status(endpoint, status.as_u16()));
        }

        Ok(response)
    }
}
