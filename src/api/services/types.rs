//! API 请求 / 响应类型
//!
//! 字段名沿用前端约定的 camelCase 写法（`originalURL`、`shortURL` 等）。

use serde::{Deserialize, Serialize};

use crate::storage::ShortUrlRecord;
use crate::utils::build_short_url;

/// `POST /api/add` 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct AddUrlRequest {
    #[serde(rename = "originalURL", default)]
    pub original_url: String,
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,
}

/// `POST /api/add` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUrlResponse {
    #[serde(rename = "shortUrl")]
    pub short_url: String,
}

/// 公开列表 / 重置点击数的返回视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUrl {
    pub code: String,
    #[serde(rename = "shortURL")]
    pub short_url: String,
    #[serde(rename = "originalURL")]
    pub original_url: String,
    #[serde(rename = "totalClicks")]
    pub total_clicks: u64,
    #[serde(rename = "isPrivate")]
    pub is_private: bool,
}

impl PublicUrl {
    pub fn from_record(record: ShortUrlRecord, base_url: &str) -> Self {
        Self {
            short_url: build_short_url(base_url, &record.code),
            code: record.code,
            original_url: record.original_url,
            total_clicks: record.clicks,
            is_private: record.is_private,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}
