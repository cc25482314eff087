use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短链接记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrlRecord {
    pub id: String,
    pub code: String,
    pub original_url: String,
    #[serde(default)]
    pub clicks: u64,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlRecord {
    /// A fresh record with a new v4 id and zero clicks.
    pub fn new(
        code: impl Into<String>,
        original_url: impl Into<String>,
        is_private: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            original_url: original_url.into(),
            clicks: 0,
            is_private,
            created_at,
        }
    }

    /// 是否满足清理条件：从未被点击且早于 cutoff 创建
    pub fn is_sweepable(&self, cutoff: DateTime<Utc>) -> bool {
        self.clicks == 0 && self.created_at < cutoff
    }
}

/// 插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// 唯一约束冲突：短码已被（可能是并发的）其他请求占用
    CodeTaken,
}
