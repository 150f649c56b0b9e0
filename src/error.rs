use std::fmt;

/// 导出器错误类型
#[derive(Debug)]
pub enum ExportError {
    /// 认证失败（API 会话或浏览器登录）
    Authentication { message: String },
    /// 参数校验失败
    Validation { message: String },
    /// 仪表盘元数据缺失或格式错误
    Resolution {
        dashboard_id: u64,
        message: String,
    },
    /// HTTP 传输失败（非成功状态码或请求错误）
    Transport {
        endpoint: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// 可视化元素渲染超时
    RenderTimeout {
        url: String,
        selector: String,
        waited_secs: u64,
    },
    /// 浏览器相关错误
    Browser {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文件操作错误
    File {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文档合成错误
    Composition {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Authentication { message } => {
                write!(f, "认证失败: {}", message)
            }
            ExportError::Validation { message } => {
                write!(f, "参数校验失败: {}", message)
            }
            ExportError::Resolution {
                dashboard_id,
                message,
            } => {
                write!(f, "仪表盘解析失败 (ID: {}): {}", dashboard_id, message)
            }
            ExportError::Transport {
                endpoint,
                status,
                source,
            } => match (status, source) {
                (Some(code), _) => {
                    write!(f, "请求失败 ({}): 状态码 {}", endpoint, code)
                }
                (None, Some(source)) => {
                    write!(f, "请求失败 ({}): {}", endpoint, source)
                }
                (None, None) => write!(f, "请求失败 ({})", endpoint),
            },
            ExportError::RenderTimeout {
                url,
                selector,
                waited_secs,
            } => {
                write!(
                    f,
                    "可视化渲染超时 ({}): 元素 {} 在 {} 秒内未出现",
                    url, selector, waited_secs
                )
            }
            ExportError::Browser { context, source } => {
                write!(f, "浏览器错误 ({}): {}", context, source)
            }
            ExportError::File { path, source } => {
                write!(f, "文件操作失败 ({}): {}", path, source)
            }
            ExportError::Composition { message, source } => match source {
                Some(source) => write!(f, "文档合成失败 ({}): {}", message, source),
                None => write!(f, "文档合成失败: {}", message),
            },
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Transport {
                source: Some(source),
                ..
            }
            | ExportError::Composition {
                source: Some(source),
                ..
            }
            | ExportError::Browser { source, .. }
            | ExportError::File { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl ExportError {
    /// 创建认证错误
    pub fn authentication(message: impl Into<String>) -> Self {
        ExportError::Authentication {
            message: message.into(),
        }
    }

    /// 创建参数校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        ExportError::Validation {
            message: message.into(),
        }
    }

    /// 创建仪表盘解析错误
    pub fn resolution(dashboard_id: u64, message: impl Into<String>) -> Self {
        ExportError::Resolution {
            dashboard_id,
            message: message.into(),
        }
    }

    /// 创建非成功状态码的传输错误
    pub fn transport_status(endpoint: impl Into<String>, status: u16) -> Self {
        ExportError::Transport {
            endpoint: endpoint.into(),
            status: Some(status),
            source: None,
        }
    }

    /// 创建请求发送失败的传输错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExportError::Transport {
            endpoint: endpoint.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// 创建渲染超时错误
    pub fn render_timeout(
        url: impl Into<String>,
        selector: impl Into<String>,
        waited_secs: u64,
    ) -> Self {
        ExportError::RenderTimeout {
            url: url.into(),
            selector: selector.into(),
            waited_secs,
        }
    }

    /// 创建浏览器错误
    pub fn browser(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExportError::Browser {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// 创建文件操作错误
    pub fn file(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExportError::File {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建文档合成错误
    pub fn composition(message: impl Into<String>) -> Self {
        ExportError::Composition {
            message: message.into(),
            source: None,
        }
    }

    /// 创建携带底层错误的文档合成错误
    pub fn composition_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ExportError::Composition {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for ExportError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ExportError::browser("CDP 调用", err)
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "未知端点".to_string());
        ExportError::transport(endpoint, err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::File {
            path: String::new(),
            source: Box::new(err),
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        ExportError::composition_source("图像处理", err)
    }
}

impl From<genpdf::error::Error> for ExportError {
    fn from(err: genpdf::error::Error) -> Self {
        ExportError::composition_source("PDF 渲染", err)
    }
}

// ========== Result 类型别名 ==========

/// 导出器结果类型
pub type Result<T> = std::result::Result<T, ExportError>;
