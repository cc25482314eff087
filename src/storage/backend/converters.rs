use crate::storage::ShortUrlRecord;
use migration::entities::short_url;

/// 将 Sea-ORM Model 转换为 ShortUrlRecord
pub fn model_to_record(model: short_url::Model) -> ShortUrlRecord {
    ShortUrlRecord {
        id: model.id,
        code: model.code,
        original_url: model.original_url,
        clicks: model.clicks.max(0) as u64,
        is_private: model.is_private,
        created_at: model.created_at,
    }
}

/// 将 ShortUrlRecord 转换为 ActiveModel（仅用于插入）
pub fn record_to_active_model(record: &ShortUrlRecord) -> short_url::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_url::ActiveModel {
        id: Set(record.id.clone()),
        code: Set(record.code.clone()),
        original_url: Set(record.original_url.clone()),
        clicks: Set(record.clicks.min(i64::MAX as u64) as i64),
        is_private: Set(record.is_private),
        created_at: Set(record.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn create_test_model() -> short_url::Model {
        short_url::Model {
            id: "0b7e7c4e-8f7d-4f0e-9a59-2f3a0d0c9e11".to_string(),
            code: "aB3xYz".to_string(),
            original_url: "https://example.com".to_string(),
            clicks: 42,
            is_private: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_record_basic() {
        let model = create_test_model();
        let expected = model.clone();

        let record = model_to_record(model);

        assert_eq!(record.id, expected.id);
        assert_eq!(record.code, expected.code);
        assert_eq!(record.original_url, expected.original_url);
        assert_eq!(record.clicks, 42);
        assert!(record.is_private);
        assert_eq!(record.created_at, expected.created_at);
    }

    #[test]
    fn test_model_to_record_negative_clicks() {
        let model = short_url::Model {
            clicks: -10, // 负数应该被转换为 0
            ..create_test_model()
        };

        assert_eq!(model_to_record(model).clicks, 0);
    }

    #[test]
    fn test_record_to_active_model_sets_every_column() {
        let mut record = ShortUrlRecord::new("xyz789", "https://target.com", false, Utc::now());
        record.clicks = 3;

        let active_model = record_to_active_model(&record);

        assert!(matches!(active_model.id, ActiveValue::Set(ref id) if *id == record.id));
        assert!(matches!(active_model.code, ActiveValue::Set(ref c) if c == "xyz789"));
        assert!(matches!(
            active_model.original_url,
            ActiveValue::Set(ref u) if u == "https://target.com"
        ));
        assert!(matches!(active_model.clicks, ActiveValue::Set(3)));
        assert!(matches!(active_model.is_private, ActiveValue::Set(false)));
        assert!(matches!(
            active_model.created_at,
            ActiveValue::Set(ts) if ts == record.created_at
        ));
    }
}
