//! Redirect resolution with click counting

use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, TinyUrlError};
use crate::storage::UrlStore;
use crate::utils::is_valid_short_code;

pub struct RedirectService {
    store: Arc<dyn UrlStore>,
}

impl RedirectService {
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self { store }
    }

    /// 点击数 +1 并返回目标地址
    ///
    /// The increment is a single `UPDATE ... SET clicks = clicks + 1` in the
    /// store, so concurrent visitors of one code never lose a count.
    pub async fn resolve_and_count(&self, code: &str) -> Result<String> {
        if !is_valid_short_code(code) {
            debug!("RedirectService: rejected malformed code '{}'", code);
            return Err(TinyUrlError::not_found("URL not found"));
        }

        match self.store.increment_clicks(code).await? {
            Some(record) => {
                debug!(
                    "RedirectService: '{}' -> {} (clicks {})",
                    code, record.original_url, record.clicks
                );
                Ok(record.original_url)
            }
            None => Err(TinyUrlError::not_found("URL not found")),
        }
    }
}
