use async_trait::async_trait;
use tracing::info;

use crate::db::DocumentStore;
use crate::document::keys::DocHotelKeys;
use crate::document::models::HotelRecord;
use crate::document::{parse_key, HOTEL};
use crate::errors::AppError;
use crate::identity::resolve_or_create;
use crate::models::hotel::HotelKey;
use crate::repository::{Created, Page, Repository};

#[derive(Clone)]
pub struct DocHotels {
    db: DocumentStore,
}

impl DocHotels {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    async fn fetch(&self, key: &str) -> Result<Option<HotelRecord>, AppError> {
        let rows: Vec<HotelRecord> = self
            .db
            .query("SELECT *, meta::id(id) AS hotel_id FROM type::thing($tb, $key)")
            .bind(("tb", HOTEL))
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl Repository for DocHotels {
    type Id = String;
    type Record = HotelRecord;
    type Create = HotelKey;
    type Update = HotelKey;

    async fn list(&self, page: Page) -> Result<Vec<HotelRecord>, AppError> {
        Ok(self
            .db
            .query("SELECT *, meta::id(id) AS hotel_id FROM hotel ORDER BY id LIMIT $limit START $skip")
            .bind(("limit", page.limit))
            .bind(("skip", page.skip))
            .await?
            .take(0)?)
    }

    async fn find(&self, id: &String) -> Result<HotelRecord, AppError> {
        let key = parse_key(id, "hotel")?;
        self.fetch(&key)
            .await?
            .ok_or_else(|| AppError::NotFound("Hotel not found".to_string()))
    }

    async fn create(&self, input: HotelKey) -> Result<Created<HotelRecord>, AppError> {
        input.validate()?;
        let resolved = resolve_or_create(&mut DocHotelKeys::new(self.db.clone()), &input).await?;
        let record = self.find(&resolved.id).await?;
        if resolved.created {
            info!("Created hotel document {} ({})", record.hotel_id, record.hotel_name);
            Ok(Created::New(record))
        } else {
            Ok(Created::Existing(record))
        }
    }

    async fn update(&self, id: &String, input: HotelKey) -> Result<HotelRecord, AppError> {
        input.validate()?;
        let existing = self.find(id).await?;
        self.db
            .query("UPDATE type::thing($tb, $key) SET hotel_name = $name RETURN NONE")
            .bind(("tb", HOTEL))
            .bind(("key", existing.hotel_id.clone()))
            .bind(("name", input.hotel_name))
            .await?
            .check()?;
        self.find(&existing.hotel_id).await
    }

    async fn delete(&self, id: &String) -> Result<(), AppError> {
        let existing = self.find(id).await?;
        self.db
            .query("DELETE type::thing($tb, $key) RETURN NONE")
            .bind(("tb", HOTEL))
            .bind(("key", existing.hotel_id))
            .await?
            .check()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::new_key;
    use crate::document::testing::memory_store;

    #[tokio::test]
    async fn test_create_twice_returns_existing() {
        let hotels = DocHotels::new(memory_store().await);
        let first = hotels.create(HotelKey::new("City Hotel")).await.unwrap();
        let second = hotels.create(HotelKey::new("City Hotel")).await.unwrap();
        assert!(first.is_new());
        assert!(!second.is_new());
        assert_eq!(first.record().hotel_id, second.record().hotel_id);
        assert_eq!(hotels.list(Page::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_padded_name_resolves_to_same_hotel() {
        let hotels = DocHotels::new(memory_store().await);
        let first = hotels.create(HotelKey::new(" City Hotel")).await.unwrap();
        let second = hotels.create(HotelKey::new("City Hotel")).await.unwrap();
        assert!(!second.is_new());
        assert_eq!(first.record().hotel_id, second.record().hotel_id);
        assert_eq!(first.record().hotel_name, "City Hotel");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let hotels = DocHotels::new(memory_store().await);
        let id = hotels
            .create(HotelKey::new("Old Name"))
            .await
            .unwrap()
            .record()
            .hotel_id
            .clone();

        let updated = hotels.update(&id, HotelKey::new("New Name")).await.unwrap();
        assert_eq!(updated.hotel_name, "New Name");

        hotels.delete(&id).await.unwrap();
        assert!(matches!(hotels.find(&id).await, Err(AppError::NotFound(_))));
        assert!(matches!(hotels.delete(&id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let hotels = DocHotels::new(memory_store().await);
        assert!(matches!(
            hotels.find(&new_key()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            hotels.find(&"123".to_string()).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_pages_do_not_overlap() {
        let hotels = DocHotels::new(memory_store().await);
        for name in ["A", "B", "C", "D", "E"] {
            hotels.create(HotelKey::new(name)).await.unwrap();
        }
        let first = hotels.list(Page::new(0, 2)).await.unwrap();
        let second = hotels.list(Page::new(2, 2)).await.unwrap();
        let rest = hotels.list(Page::new(4, 10)).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(rest.len(), 1);

        let mut ids: Vec<_> = first
            .iter()
            .chain(&second)
            .chain(&rest)
            .map(|h| h.hotel_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
