pub mod url_validator;

/// 短码允许的最大长度（与数据库列宽一致）
pub const MAX_SHORT_CODE_LEN: usize = 64;

/// 短码格式校验：非空、ASCII 字母数字、不超过列宽
///
/// 重定向路径在查库前先过一遍，非法输入直接 404。
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_SHORT_CODE_LEN
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// 拼接完整短链接：`{base_url}/{code}`
pub fn build_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
