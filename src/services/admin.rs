//! Administrative operations
//!
//! Deletes are guarded by the static `X-Secret-Token`; an empty configured
//! secret turns them off entirely.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::errors::{Result, TinyUrlError};
use crate::storage::{ShortUrlRecord, UrlStore};

pub struct AdminService {
    store: Arc<dyn UrlStore>,
    secret_token: String,
    base_url: String,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        secret_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            secret_token: secret_token.into(),
            base_url: base_url.into(),
        }
    }

    /// 列表与重置响应里拼接 shortURL 用
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, token: Option<&str>) -> Result<()> {
        if self.secret_token.is_empty() {
            warn!("AdminService: delete requested but no secret token is configured");
            return Err(TinyUrlError::unauthorized("Unauthorized"));
        }

        let provided = token.unwrap_or_default();
        if bool::from(provided.as_bytes().ct_eq(self.secret_token.as_bytes())) {
            Ok(())
        } else {
            Err(TinyUrlError::unauthorized("Unauthorized"))
        }
    }

    pub async fn delete_one(&self, code: &str, token: Option<&str>) -> Result<()> {
        self.authorize(token)?;

        if self.store.delete_by_code(code).await? {
            info!("AdminService: deleted '{}'", code);
            Ok(())
        } else {
            Err(TinyUrlError::not_found("URL not found"))
        }
    }

    /// 删除全部记录，返回删除数量
    pub async fn delete_all(&self, token: Option<&str>) -> Result<u64> {
        self.authorize(token)?;

        let deleted = self.store.delete_all().await?;
        info!("AdminService: deleted all {} records", deleted);
        Ok(deleted)
    }

    pub async fn reset_clicks(&self, code: &str) -> Result<ShortUrlRecord> {
        match self.store.reset_clicks(code).await? {
            Some(record) => {
                info!("AdminService: reset clicks for '{}'", code);
                Ok(record)
            }
            None => Err(TinyUrlError::not_found("URL not found")),
        }
    }

    /// Non-private records, newest first.
    pub async fn list_public(&self) -> Result<Vec<ShortUrlRecord>> {
        self.store.list_public().await
    }
}
