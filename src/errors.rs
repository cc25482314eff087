use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinyUrlError {
    InvalidInput(String),
    Unauthorized(String),
    NotFound(String),
    CodeSpaceExhausted(String),
    Configuration(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
}

impl TinyUrlError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinyUrlError::InvalidInput(_) => "E001",
            TinyUrlError::Unauthorized(_) => "E002",
            TinyUrlError::NotFound(_) => "E003",
            TinyUrlError::CodeSpaceExhausted(_) => "E004",
            TinyUrlError::Configuration(_) => "E005",
            TinyUrlError::DatabaseConfig(_) => "E006",
            TinyUrlError::DatabaseConnection(_) => "E007",
            TinyUrlError::DatabaseOperation(_) => "E008",
            TinyUrlError::Serialization(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinyUrlError::InvalidInput(_) => "Invalid Input",
            TinyUrlError::Unauthorized(_) => "Unauthorized",
            TinyUrlError::NotFound(_) => "Resource Not Found",
            TinyUrlError::CodeSpaceExhausted(_) => "Code Space Exhausted",
            TinyUrlError::Configuration(_) => "Configuration Error",
            TinyUrlError::DatabaseConfig(_) => "Database Configuration Error",
            TinyUrlError::DatabaseConnection(_) => "Database Connection Error",
            TinyUrlError::DatabaseOperation(_) => "Database Operation Error",
            TinyUrlError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinyUrlError::InvalidInput(msg)
            | TinyUrlError::Unauthorized(msg)
            | TinyUrlError::NotFound(msg)
            | TinyUrlError::CodeSpaceExhausted(msg)
            | TinyUrlError::Configuration(msg)
            | TinyUrlError::DatabaseConfig(msg)
            | TinyUrlError::DatabaseConnection(msg)
            | TinyUrlError::DatabaseOperation(msg)
            | TinyUrlError::Serialization(msg) => msg,
        }
    }

    /// HTTP 边界上的状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            TinyUrlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TinyUrlError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TinyUrlError::NotFound(_) => StatusCode::NOT_FOUND,
            TinyUrlError::CodeSpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            TinyUrlError::Configuration(_)
            | TinyUrlError::DatabaseConfig(_)
            | TinyUrlError::DatabaseConnection(_)
            | TinyUrlError::DatabaseOperation(_)
            | TinyUrlError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message is safe to show to API callers.
    ///
    /// Infrastructure errors carry driver details that stay in the logs.
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinyUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinyUrlError {}

// 便捷的构造函数
impl TinyUrlError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::InvalidInput(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::NotFound(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::CodeSpaceExhausted(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::Configuration(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TinyUrlError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for TinyUrlError {
    fn from(err: sea_orm::DbErr) -> Self {
        TinyUrlError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TinyUrlError {
    fn from(err: serde_json::Error) -> Self {
        TinyUrlError::Serialization(err.to_string())
    }
}

impl From<crate::utils::url_validator::UrlValidationError> for TinyUrlError {
    fn from(err: crate::utils::url_validator::UrlValidationError) -> Self {
        TinyUrlError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TinyUrlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            TinyUrlError::invalid_input("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TinyUrlError::unauthorized("nope").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TinyUrlError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TinyUrlError::code_space_exhausted("full").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TinyUrlError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(TinyUrlError::not_found("x").is_client_error());
        assert!(!TinyUrlError::database_connection("x").is_client_error());
        assert!(!TinyUrlError::code_space_exhausted("x").is_client_error());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = TinyUrlError::not_found("URL not found");
        assert_eq!(err.to_string(), "Resource Not Found: URL not found");
        assert_eq!(err.message(), "URL not found");
        assert_eq!(err.code(), "E003");
    }

    #[test]
    fn test_from_db_err() {
        let err: TinyUrlError = sea_orm::DbErr::Custom("disk full".to_string()).into();
        assert!(matches!(err, TinyUrlError::DatabaseOperation(ref m) if m.contains("disk full")));
    }
}
