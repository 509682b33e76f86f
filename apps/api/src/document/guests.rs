use async_trait::async_trait;
use tracing::info;

use crate::db::DocumentStore;
use crate::document::keys::DocGuestKeys;
use crate::document::models::GuestRecord;
use crate::document::{parse_key, GUEST};
use crate::errors::AppError;
use crate::identity::resolve_or_create;
use crate::models::guest::GuestKey;
use crate::repository::{Created, Page, Repository};

#[derive(Clone)]
pub struct DocGuests {
    db: DocumentStore,
}

impl DocGuests {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    async fn fetch(&self, key: &str) -> Result<Option<GuestRecord>, AppError> {
        let rows: Vec<GuestRecord> = self
            .db
            .query("SELECT *, meta::id(id) AS guest_id FROM type::thing($tb, $key)")
            .bind(("tb", GUEST))
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl Repository for DocGuests {
    type Id = String;
    type Record = GuestRecord;
    type Create = GuestKey;
    type Update = GuestKey;

    async fn list(&self, page: Page) -> Result<Vec<GuestRecord>, AppError> {
        Ok(self
            .db
            .query("SELECT *, meta::id(id) AS guest_id FROM guest ORDER BY id LIMIT $limit START $skip")
            .bind(("limit", page.limit))
            .bind(("skip", page.skip))
            .await?
            .take(0)?)
    }

    async fn find(&self, id: &String) -> Result<GuestRecord, AppError> {
        let key = parse_key(id, "guest")?;
        self.fetch(&key)
            .await?
            .ok_or_else(|| AppError::NotFound("Guest not found".to_string()))
    }

    async fn create(&self, input: GuestKey) -> Result<Created<GuestRecord>, AppError> {
        input.validate()?;
        let resolved = resolve_or_create(&mut DocGuestKeys::new(self.db.clone()), &input).await?;
        let record = self.find(&resolved.id).await?;
        if resolved.created {
            info!(
                "Created guest document {} ({}, {})",
                record.guest_id, record.country, record.customer_type
            );
            Ok(Created::New(record))
        } else {
            Ok(Created::Existing(record))
        }
    }

    async fn update(&self, id: &String, input: GuestKey) -> Result<GuestRecord, AppError> {
        input.validate()?;
        let existing = self.find(id).await?;
        self.db
            .query(
                "UPDATE type::thing($tb, $key) SET country = $country, \
                 is_repeated_guest = $repeated, customer_type = $customer_type RETURN NONE",
            )
            .bind(("tb", GUEST))
            .bind(("key", existing.guest_id.clone()))
            .bind(("country", input.country))
            .bind(("repeated", input.is_repeated_guest))
            .bind(("customer_type", input.customer_type))
            .await?
            .check()?;
        self.find(&existing.guest_id).await
    }

    async fn delete(&self, id: &String) -> Result<(), AppError> {
        let existing = self.find(id).await?;
        self.db
            .query("DELETE type::thing($tb, $key) RETURN NONE")
            .bind(("tb", GUEST))
            .bind(("key", existing.guest_id))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testing::memory_store;

    fn key(country: &str) -> GuestKey {
        GuestKey {
            country: country.to_string(),
            is_repeated_guest: false,
            customer_type: "Transient".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_is_idempotent_on_natural_key() {
        let guests = DocGuests::new(memory_store().await);
        let first = guests.create(key("TST")).await.unwrap();
        let second = guests.create(key("TST")).await.unwrap();
        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.record().guest_id, second.record().guest_id);
    }

    #[tokio::test]
    async fn test_update_onto_existing_key_conflicts() {
        let guests = DocGuests::new(memory_store().await);
        guests.create(key("PRT")).await.unwrap();
        let other = guests.create(key("ESP")).await.unwrap();
        let err = guests
            .update(&other.record().guest_id, key("PRT"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_country_rejected_before_write() {
        let guests = DocGuests::new(memory_store().await);
        let err = guests.create(key("PORT")).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert!(guests.list(Page::default()).await.unwrap().is_empty());
    }
}
