use async_trait::async_trait;

use crate::db::DocumentStore;
use crate::document::models::{GuestDocument, HotelDocument, Metadata};
use crate::document::{new_key, KeyRow, GUEST, HOTEL};
use crate::errors::AppError;
use crate::identity::NaturalKeyStore;
use crate::models::guest::GuestKey;
use crate::models::hotel::HotelKey;

const CREATE_RECORD: &str = "CREATE type::thing($tb, $key) CONTENT $doc RETURN NONE";

pub struct DocHotelKeys {
    db: DocumentStore,
}

impl DocHotelKeys {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NaturalKeyStore for DocHotelKeys {
    type Key = HotelKey;
    type Id = String;

    async fn find_by_key(&mut self, key: &HotelKey) -> Result<Option<String>, AppError> {
        let rows: Vec<KeyRow> = self
            .db
            .query("SELECT meta::id(id) AS key FROM hotel WHERE hotel_name = $name LIMIT 1")
            .bind(("name", key.hotel_name.clone()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|row| row.key))
    }

    async fn insert(&mut self, key: &HotelKey) -> Result<String, AppError> {
        let id = new_key();
        let doc = HotelDocument {
            hotel_name: key.hotel_name.clone(),
            metadata: Metadata::now(),
        };
        self.db
            .query(CREATE_RECORD)
            .bind(("tb", HOTEL))
            .bind(("key", id.clone()))
            .bind(("doc", doc))
            .await?
            .check()?;
        Ok(id)
    }
}

pub struct DocGuestKeys {
    db: DocumentStore,
}

impl DocGuestKeys {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NaturalKeyStore for DocGuestKeys {
    type Key = GuestKey;
    type Id = String;

    async fn find_by_key(&mut self, key: &GuestKey) -> Result<Option<String>, AppError> {
        let rows: Vec<KeyRow> = self
            .db
            .query(
                "SELECT meta::id(id) AS key FROM guest \
                 WHERE country = $country AND is_repeated_guest = $repeated \
                 AND customer_type = $customer_type LIMIT 1",
            )
            .bind(("country", key.country.clone()))
            .bind(("repeated", key.is_repeated_guest))
            .bind(("customer_type", key.customer_type.clone()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next().map(|row| row.key))
    }

    async fn insert(&mut self, key: &GuestKey) -> Result<String, AppError> {
        let id = new_key();
        let doc = GuestDocument {
            country: key.country.clone(),
            is_repeated_guest: key.is_repeated_guest,
            customer_type: key.customer_type.clone(),
            metadata: Metadata::now(),
        };
        self.db
            .query(CREATE_RECORD)
            .bind(("tb", GUEST))
            .bind(("key", id.clone()))
            .bind(("doc", doc))
            .await?
            .check()?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testing::memory_store;
    use crate::identity::resolve_or_create;

    #[tokio::test]
    async fn test_hotel_key_resolves_once() {
        let mut keys = DocHotelKeys::new(memory_store().await);
        let key = HotelKey::new("City Hotel");
        let first = resolve_or_create(&mut keys, &key).await.unwrap();
        let second = resolve_or_create(&mut keys, &key).await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_guest_repeat_flag_is_part_of_key() {
        let mut keys = DocGuestKeys::new(memory_store().await);
        let mut key = GuestKey {
            country: "PRT".to_string(),
            is_repeated_guest: false,
            customer_type: "Transient".to_string(),
        };
        let first = resolve_or_create(&mut keys, &key).await.unwrap();
        key.is_repeated_guest = true;
        let second = resolve_or_create(&mut keys, &key).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_conflict() {
        let mut keys = DocHotelKeys::new(memory_store().await);
        let key = HotelKey::new("Resort Hotel");
        keys.insert(&key).await.unwrap();
        let err = keys.insert(&key).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
