//! URL 验证模块
//!
//! 目标地址必须是合法的绝对 URI，并阻止可执行脚本的危险协议

use url::Url;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    NotAbsolute(String),
    DangerousProtocol(String),
    ForbiddenCharacter(char),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::NotAbsolute(msg) => write!(f, "Invalid URL: {}", msg),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::ForbiddenCharacter(c) => {
                write!(f, "Invalid URL: contains forbidden character {:?}", c)
            }
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 验证目标 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不含空白或控制字符（存库后要原样写进 Location 头）
/// 3. 能解析为绝对 URI（必须带 scheme）
/// 4. 不是危险协议（javascript:, data:, file: 等）
///
/// 返回去掉首尾空白后的原始字符串，存库时保持调用方的写法。
pub fn validate_url(url: &str) -> Result<&str, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    // Url::parse 会静默丢弃 \t \n \r，这里必须先拦下
    if let Some(c) = url.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::ForbiddenCharacter(c));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::NotAbsolute(e.to_string()))?;

    // Url::parse 会把 scheme 统一转成小写
    if DANGEROUS_PROTOCOLS.contains(&parsed.scheme()) {
        return Err(UrlValidationError::DangerousProtocol(format!(
            "{}:",
            parsed.scheme()
        )));
    }

    Ok(url)
}
