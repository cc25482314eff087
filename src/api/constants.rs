//! API 模块常量定义

/// 删除操作携带的共享密钥 header
pub const SECRET_TOKEN_HEADER: &str = "X-Secret-Token";

/// JSON 请求体上限
pub const MAX_JSON_PAYLOAD: usize = 64 * 1024;
