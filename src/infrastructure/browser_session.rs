//! 浏览器会话 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露导航、等待、测量、截图等能力。

use std::time::{Duration, Instant};

use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::models::ElementRect;

/// 登录表单的用户名输入框
const USERNAME_SELECTOR: &str = "input[name=username]";
/// 登录表单的密码输入框
const PASSWORD_SELECTOR: &str = "input[name=password]";
/// 登录提交按钮
const LOGIN_BUTTON_SELECTOR: &str = ".Button";

/// 元素出现轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器会话
///
/// 职责：
/// - 持有唯一的 Page 资源（不可克隆，调用方只能独占借用）
/// - 暴露导航 / 等待元素 / 读取布局 / 截图能力
/// - 不认识 Question / Dashboard，不处理业务流程
///
/// 导航类方法全部接收 `&mut self`：同一会话上的截图必须串行，
/// 并发导航会破坏进行中的截图状态。
pub struct BrowserSession {
    page: Page,
    login_timeout: Duration,
    render_timeout: Duration,
    settle: Duration,
}

impl BrowserSession {
    /// 创建新的浏览器会话
    pub fn new(page: Page, login_timeout: Duration, render_timeout: Duration, settle: Duration) -> Self {
        Self {
            page,
            login_timeout,
            render_timeout,
            settle,
        }
    }

    /// 在登录页填写凭据并提交，阻塞直到 URL 变化或超时
    ///
    /// 超时视为凭据被拒绝，返回认证错误；不做重试。
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        // Metabase 登录页是 SPA，表单异步渲染，先等输入框出现
        self.wait_for_selector(USERNAME_SELECTOR, self.login_timeout)
            .await
            .map_err(|_| ExportError::authentication("登录页未出现用户名输入框".to_string()))?;

        let url_before = self.current_url().await?;

        let user_input = self.page.find_element(USERNAME_SELECTOR).await?;
        user_input.click().await?;
        user_input.type_str(username).await?;

        let password_input = self.page.find_element(PASSWORD_SELECTOR).await?;
        password_input.click().await?;
        password_input.type_str(password).await?;

        self.page.find_element(LOGIN_BUTTON_SELECTOR).await?.click().await?;
        debug!("登录表单已提交，等待跳转...");

        // URL 变化即视为登录成功
        let deadline = Instant::now() + self.login_timeout;
        loop {
            sleep(POLL_INTERVAL).await;
            let url_now = self.current_url().await?;
            if url_now != url_before {
                info!("✅ 浏览器登录成功: {}", url_now);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ExportError::authentication(format!(
                    "浏览器登录在 {} 秒内未跳转，凭据可能无效",
                    self.login_timeout.as_secs()
                )));
            }
        }
    }

    /// 导航到指定 URL 并等待页面加载完成
    pub async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ExportError::browser(format!("导航到 {}", url), e))?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// 等待指定选择器的元素出现，超时返回渲染超时错误
    ///
    /// 图表损坏时元素可能永远不渲染，超时是硬失败，不重试。
    pub async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                let url = self.current_url().await.unwrap_or_default();
                return Err(ExportError::render_timeout(url, selector, timeout.as_secs()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 等待可视化元素出现并稳定（使用会话配置的渲染超时）
    pub async fn wait_for_render(&mut self, selector: &str) -> Result<()> {
        self.wait_for_selector(selector, self.render_timeout).await?;
        // 元素出现后再等布局稳定，裁剪前不再二次测量
        sleep(self.settle).await;
        Ok(())
    }

    /// 读取元素当前的布局矩形
    pub async fn element_rect(&mut self, selector: &str) -> Result<ElementRect> {
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector("{}");
                if (!el) return null;
                const r = el.getBoundingClientRect();
                return {{ x: r.x, y: r.y, width: r.width, height: r.height }};
            }})()
            "#,
            selector
        );

        let rect: Option<ElementRect> = self.eval_as(script).await?;
        rect.ok_or_else(|| {
            ExportError::composition(format!("元素 {} 在测量时已不存在", selector))
        })
    }

    /// 截取当前视口的 PNG 截图
    pub async fn screenshot_viewport(&mut self) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let bytes = self
            .page
            .screenshot(params)
            .await
            .map_err(|e| ExportError::browser("视口截图", e))?;
        Ok(bytes)
    }

    /// 当前页面 URL
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&mut self, js_code: impl Into<String>) -> Result<T> {
        let result = self.page.evaluate(js_code.into()).await?;
        let typed_value = result
            .into_value()
            .map_err(|e| ExportError::browser("解析 JS 执行结果", e))?;
        Ok(typed_value)
    }
}
