use std::path::PathBuf;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器可执行文件路径（为空时使用系统默认 Chrome）
    pub chrome_executable: Option<PathBuf>,
    /// Metabase 服务主机
    pub metabase_host: String,
    /// Metabase 服务端口
    pub metabase_port: u16,
    /// 登录用户名
    pub metabase_username: String,
    /// 登录密码
    pub metabase_password: String,
    /// 导出文件输出目录
    pub output_dir: PathBuf,
    /// 浏览器视口宽度（固定视口保证截图坐标可复现）
    pub viewport_width: u32,
    /// 浏览器视口高度
    pub viewport_height: u32,
    /// 浏览器登录跳转等待上限（秒）
    pub login_timeout_secs: u64,
    /// 可视化元素渲染等待上限（秒）
    pub render_timeout_secs: u64,
    /// 元素出现后的布局稳定等待（毫秒）
    pub settle_millis: u64,
    /// PDF 字体目录（为空时按默认顺序查找）
    pub fonts_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            metabase_host: "localhost".to_string(),
            metabase_port: 3000,
            metabase_username: String::new(),
            metabase_password: String::new(),
            output_dir: PathBuf::from("."),
            viewport_width: 1920,
            viewport_height: 1080,
            login_timeout_secs: 30,
            render_timeout_secs: 30,
            settle_millis: 500,
            fonts_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().map(PathBuf::from),
            metabase_host: std::env::var("METABASE_HOST").unwrap_or(default.metabase_host),
            metabase_port: std::env::var("METABASE_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.metabase_port),
            metabase_username: std::env::var("METABASE_USERNAME").unwrap_or(default.metabase_username),
            metabase_password: std::env::var("METABASE_PASSWORD").unwrap_or(default.metabase_password),
            output_dir: std::env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(default.output_dir),
            viewport_width: std::env::var("VIEWPORT_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(default.viewport_width),
            viewport_height: std::env::var("VIEWPORT_HEIGHT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.viewport_height),
            login_timeout_secs: std::env::var("LOGIN_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.login_timeout_secs),
            render_timeout_secs: std::env::var("RENDER_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.render_timeout_secs),
            settle_millis: std::env::var("SETTLE_MILLIS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_millis),
            fonts_dir: std::env::var("METABASE_EXPORTER_FONTS_DIR").ok().map(PathBuf::from),
        }
    }

    /// Metabase 服务基础 URL
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.metabase_host, self.metabase_port)
    }
}
