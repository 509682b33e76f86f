use async_trait::async_trait;
use tracing::info;

use crate::db::DocumentStore;
use crate::document::models::{BookingDocument, BookingRecord, GuestSnapshot, HotelSnapshot};
use crate::document::{new_key, parse_key, DocGuests, DocHotels, BOOKING};
use crate::errors::AppError;
use crate::models::booking::{BookingCreate, BookingUpdate, FieldPatch};
use crate::repository::{Created, Page, Repository};

#[derive(Clone)]
pub struct DocBookings {
    db: DocumentStore,
}

impl DocBookings {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    async fn fetch(&self, key: &str) -> Result<Option<BookingRecord>, AppError> {
        let rows: Vec<BookingRecord> = self
            .db
            .query("SELECT *, meta::id(id) AS booking_id FROM type::thing($tb, $key)")
            .bind(("tb", BOOKING))
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Paged listing with an optional `status.is_canceled` filter.
    pub async fn list_filtered(
        &self,
        page: Page,
        is_canceled: Option<bool>,
    ) -> Result<Vec<BookingRecord>, AppError> {
        let filter = if is_canceled.is_some() {
            "WHERE status.is_canceled = $canceled "
        } else {
            ""
        };
        let sql = format!(
            "SELECT *, meta::id(id) AS booking_id FROM booking {filter}ORDER BY id LIMIT $limit START $skip"
        );
        Ok(self
            .db
            .query(sql)
            .bind(("canceled", is_canceled.unwrap_or(false)))
            .bind(("limit", page.limit))
            .bind(("skip", page.skip))
            .await?
            .take(0)?)
    }
}

/// Writes a booking document under a fresh key. No reference checks; the
/// snapshots are taken as given.
pub async fn insert_booking_document(
    db: &DocumentStore,
    doc: BookingDocument,
) -> Result<String, AppError> {
    let key = new_key();
    db.query("CREATE type::thing($tb, $key) CONTENT $doc RETURN NONE")
        .bind(("tb", BOOKING))
        .bind(("key", key.clone()))
        .bind(("doc", doc))
        .await?
        .check()?;
    Ok(key)
}

/// `UPDATE ... SET a.b = $p0, c.d = $p1 ...` for the patched document paths.
fn update_statement(patch: &FieldPatch) -> String {
    let assignments: Vec<String> = patch
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = $p{i}", column.document_path()))
        .collect();
    format!(
        "UPDATE type::thing($tb, $key) SET {} RETURN NONE",
        assignments.join(", ")
    )
}

#[async_trait]
impl Repository for DocBookings {
    type Id = String;
    type Record = BookingRecord;
    type Create = BookingCreate<String>;
    type Update = BookingUpdate;

    async fn list(&self, page: Page) -> Result<Vec<BookingRecord>, AppError> {
        self.list_filtered(page, None).await
    }

    async fn find(&self, id: &String) -> Result<BookingRecord, AppError> {
        let key = parse_key(id, "booking")?;
        self.fetch(&key)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    /// Embeds snapshots of the referenced hotel and guest. Both must exist.
    async fn create(
        &self,
        input: BookingCreate<String>,
    ) -> Result<Created<BookingRecord>, AppError> {
        input.attributes.validate()?;
        let hotel = DocHotels::new(self.db.clone()).find(&input.hotel_id).await?;
        let guest = DocGuests::new(self.db.clone()).find(&input.guest_id).await?;

        let doc = BookingDocument::new(
            HotelSnapshot::from(&hotel),
            GuestSnapshot::from(&guest),
            input.attributes,
        );
        let key = insert_booking_document(&self.db, doc).await?;
        info!(
            "Created booking document {} for hotel {} and guest {}",
            key, hotel.hotel_id, guest.guest_id
        );
        Ok(Created::New(self.find(&key).await?))
    }

    async fn update(&self, id: &String, input: BookingUpdate) -> Result<BookingRecord, AppError> {
        let patch = FieldPatch::try_from(input)?;
        let existing = self.find(id).await?;

        let mut query = self
            .db
            .query(update_statement(&patch))
            .bind(("tb", BOOKING))
            .bind(("key", existing.booking_id.clone()));
        for (i, (_, value)) in patch.iter().enumerate() {
            query = query.bind((format!("p{i}"), value.clone()));
        }
        query.await?.check()?;

        info!("Updated {} field(s) of booking document {}", patch.len(), existing.booking_id);
        self.find(&existing.booking_id).await
    }

    async fn delete(&self, id: &String) -> Result<(), AppError> {
        let existing = self.find(id).await?;
        self.db
            .query("DELETE type::thing($tb, $key) RETURN NONE")
            .bind(("tb", BOOKING))
            .bind(("key", existing.booking_id))
            .await?
            .check()?;
        Ok(())
    }
}
