//! Short code allocation
//!
//! Reserves a unique code for a new long URL. The store's unique index is the
//! real guard; the existence check only saves a failed insert in the common case.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AllocationConfig;
use crate::errors::{Result, TinyUrlError};
use crate::services::code_generator::CodeGenerator;
use crate::storage::{InsertOutcome, ShortUrlRecord, UrlStore};
use crate::utils::build_short_url;
use crate::utils::url_validator::validate_url;

/// 分配结果：已写入的记录 + 完整短链接
#[derive(Debug, Clone)]
pub struct Allocation {
    pub record: ShortUrlRecord,
    pub short_url: String,
}

pub struct AllocationService {
    store: Arc<dyn UrlStore>,
    generator: Arc<CodeGenerator>,
    config: AllocationConfig,
    base_url: String,
}

impl AllocationService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<CodeGenerator>,
        config: AllocationConfig,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            config,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate `original_url` and store it under a fresh code.
    ///
    /// Tries `max_attempts_per_length` candidates per length, starting at
    /// `code_length` and growing by one up to `max_code_length`.
    pub async fn allocate(&self, original_url: &str, is_private: bool) -> Result<Allocation> {
        let original_url = validate_url(original_url)?;

        let start_len = self.config.code_length.max(1);
        let max_len = self.config.max_code_length.max(start_len);
        let attempts = self.config.max_attempts_per_length.max(1);

        for length in start_len..=max_len {
            if length > start_len {
                warn!(
                    "AllocationService: {} collisions at length {}, widening to {}",
                    attempts,
                    length - 1,
                    length
                );
            }

            for attempt in 1..=attempts {
                let code = self.generator.generate(length);

                if self.store.code_exists(&code).await? {
                    debug!(
                        "AllocationService: code '{}' already taken (attempt {}/{})",
                        code, attempt, attempts
                    );
                    continue;
                }

                let record = ShortUrlRecord::new(&code, original_url, is_private, Utc::now());
                match self.store.insert(&record).await? {
                    InsertOutcome::Inserted => {
                        info!(
                            "AllocationService: created '{}' -> {}",
                            record.code, record.original_url
                        );
                        let short_url = build_short_url(&self.base_url, &record.code);
                        return Ok(Allocation { record, short_url });
                    }
                    InsertOutcome::CodeTaken => {
                        // 检查之后被并发请求抢占
                        debug!(
                            "AllocationService: insert conflict on '{}' (attempt {}/{})",
                            code, attempt, attempts
                        );
                    }
                }
            }
        }

        warn!(
            "AllocationService: no free code up to length {} after {} attempts per length",
            max_len, attempts
        );
        Err(TinyUrlError::code_space_exhausted(format!(
            "Could not allocate a short code (tried lengths {}..={})",
            start_len, max_len
        )))
    }
}
