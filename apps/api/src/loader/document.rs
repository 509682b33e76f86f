use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::db::DocumentStore;
use crate::document::bookings::insert_booking_document;
use crate::document::keys::{DocGuestKeys, DocHotelKeys};
use crate::document::models::{BookingDocument, GuestSnapshot, HotelSnapshot};
use crate::document::{count_records, BOOKING, GUEST, HOTEL};
use crate::errors::AppError;
use crate::identity::{resolve_or_create, KeyCache};
use crate::loader::{open_csv, read_row, CsvRow, LoadSummary, LoadedRow};
use crate::models::guest::GuestKey;
use crate::models::hotel::HotelKey;

struct Resolver {
    hotels: KeyCache<HotelKey, String>,
    guests: KeyCache<GuestKey, String>,
    hotel_keys: DocHotelKeys,
    guest_keys: DocGuestKeys,
}

impl Resolver {
    /// Every document write is durable on its own, so resolved ids are cached
    /// as soon as they come back.
    async fn hotel(&mut self, key: &HotelKey) -> Result<String, AppError> {
        if let Some(id) = self.hotels.get(key) {
            return Ok(id);
        }
        let id = resolve_or_create(&mut self.hotel_keys, key).await?.id;
        self.hotels.record(key.clone(), id.clone());
        Ok(id)
    }

    async fn guest(&mut self, key: &GuestKey) -> Result<String, AppError> {
        if let Some(id) = self.guests.get(key) {
            return Ok(id);
        }
        let id = resolve_or_create(&mut self.guest_keys, key).await?.id;
        self.guests.record(key.clone(), id.clone());
        Ok(id)
    }
}

async fn load_row(
    db: &DocumentStore,
    resolver: &mut Resolver,
    row: LoadedRow,
) -> Result<String, AppError> {
    let hotel_id = resolver.hotel(&row.hotel).await?;
    let guest_id = resolver.guest(&row.guest).await?;
    let doc = BookingDocument::new(
        HotelSnapshot {
            hotel_id,
            hotel_name: row.hotel.hotel_name,
        },
        GuestSnapshot {
            guest_id,
            country: row.guest.country,
            is_repeated_guest: row.guest.is_repeated_guest,
        },
        row.attributes,
    );
    insert_booking_document(db, doc).await
}

/// Loads `path` into the document store, one write per row. Progress is
/// reported every `report_every` inserted rows.
pub async fn load_document(
    db: &DocumentStore,
    path: &Path,
    report_every: usize,
) -> Result<LoadSummary> {
    let report_every = report_every.max(1) as u64;
    let mut reader = open_csv(path)?;
    let mut summary = LoadSummary::default();
    let mut resolver = Resolver {
        hotels: KeyCache::new(),
        guests: KeyCache::new(),
        hotel_keys: DocHotelKeys::new(db.clone()),
        guest_keys: DocGuestKeys::new(db.clone()),
    };

    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row_num = index + 1;
        let result = match read_row(record) {
            Ok(row) => load_row(db, &mut resolver, row).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(_) => {
                summary.inserted += 1;
                if summary.inserted % report_every == 0 {
                    info!("Inserted {} records so far...", summary.inserted);
                }
            }
            Err(e) => {
                warn!("Error processing row {row_num}: {e}");
                summary.failed += 1;
            }
        }
    }

    summary.hotels = count_records(db, HOTEL).await?;
    summary.guests = count_records(db, GUEST).await?;
    summary.bookings = count_records(db, BOOKING).await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::document::testing::memory_store;
    use crate::document::DocBookings;
    use crate::loader::tests::sample_csv;
    use crate::repository::{Page, Repository};

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_csv().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_counts_and_skips_bad_rows() {
        let db = memory_store().await;
        let file = csv_file();
        let summary = load_document(&db, file.path(), 2).await.unwrap();
        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.hotels, 2);
        assert_eq!(summary.guests, 4);
        assert_eq!(summary.bookings, 4);
    }

    #[tokio::test]
    async fn test_reload_duplicates_bookings_only() {
        let db = memory_store().await;
        let file = csv_file();
        let first = load_document(&db, file.path(), 1000).await.unwrap();
        let second = load_document(&db, file.path(), 1000).await.unwrap();
        assert_eq!(second.bookings, first.bookings * 2);
        assert_eq!(second.hotels, first.hotels);
        assert_eq!(second.guests, first.guests);
    }

    #[tokio::test]
    async fn test_loaded_booking_embeds_snapshots() {
        let db = memory_store().await;
        let file = csv_file();
        load_document(&db, file.path(), 1000).await.unwrap();

        let bookings = DocBookings::new(db).list(Page::default()).await.unwrap();
        let unknown = bookings
            .iter()
            .find(|b| b.guest.country == "UNK")
            .expect("row without country");
        assert_eq!(unknown.hotel.hotel_name, "City Hotel");
        assert_eq!(unknown.booking_details.agent, Some(9));
        assert!(unknown.status.is_canceled);
    }
}
