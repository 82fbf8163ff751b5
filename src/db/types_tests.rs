//! Unit tests for database key utilities

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use crate::db::types::{IdList, RecordKey, TagKey};
    use crate::schema::PropertyValue;

    #[test]
    fn test_record_key_orders_numerically() {
        let small = RecordKey(2).to_bytes();
        let large = RecordKey(256).to_bytes();
        assert!(small < large);
    }

    #[test]
    fn test_record_key_from_bytes() {
        let bytes = RecordKey(1234).to_bytes();
        assert_eq!(RecordKey::from_bytes(&bytes).unwrap(), RecordKey(1234));
    }

    #[test]
    fn test_record_key_wrong_length() {
        let result = RecordKey::from_bytes(&[1, 2, 3]);
        assert!(matches!(result, Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_tag_key_shares_property_prefix() {
        let rock = PropertyValue::from("rock");
        let year = PropertyValue::Int(1999);
        let prefix = TagKey::prefix("genre").unwrap();

        assert!(TagKey::new("genre", &rock).to_bytes().unwrap().starts_with(&prefix));
        assert!(TagKey::new("genre", &year).to_bytes().unwrap().starts_with(&prefix));
        assert!(!TagKey::new("genres", &rock).to_bytes().unwrap().starts_with(&prefix));
    }

    #[test]
    fn test_tag_key_decode() {
        let value = PropertyValue::Float(2.5);
        let bytes = TagKey::new("score", &value).to_bytes().unwrap();
        let (property, decoded) = TagKey::decode(&bytes).unwrap();
        assert_eq!(property, "score");
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_id_list_stays_sorted() {
        let mut ids = IdList::default();
        assert!(ids.insert(5));
        assert!(ids.insert(1));
        assert!(ids.insert(3));
        assert!(!ids.insert(3));
        assert_eq!(ids.0, vec![1, 3, 5]);

        assert!(ids.remove(3));
        assert!(!ids.remove(3));
        assert_eq!(ids.0, vec![1, 5]);
    }

    #[test]
    fn test_id_list_bytes() {
        let ids = IdList(vec![1, 2, 300]);
        let bytes = ids.to_bytes().unwrap();
        assert_eq!(IdList::from_bytes(&bytes).unwrap(), ids);
    }
}
