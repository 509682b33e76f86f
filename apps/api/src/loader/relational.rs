use std::path::Path;

use anyhow::{Context, Result};
use sqlx::{Acquire, PgConnection, PgPool};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::identity::{resolve_or_create, KeyCache};
use crate::loader::{open_csv, read_row, CsvRow, LoadSummary, LoadedRow};
use crate::models::guest::GuestKey;
use crate::models::hotel::HotelKey;
use crate::relational::bookings::insert_booking;
use crate::relational::keys::{PgGuestKeys, PgHotelKeys};

/// Ids resolved inside the open batch. They join the cache only once the
/// batch commits, so a rolled-back insert never leaves a dangling id behind.
#[derive(Default)]
struct Pending {
    hotels: Vec<(HotelKey, i64)>,
    guests: Vec<(GuestKey, i64)>,
}

struct Caches {
    hotels: KeyCache<HotelKey, i64>,
    guests: KeyCache<GuestKey, i64>,
}

impl Caches {
    fn absorb(&mut self, pending: &mut Pending) {
        for (key, id) in pending.hotels.drain(..) {
            self.hotels.record(key, id);
        }
        for (key, id) in pending.guests.drain(..) {
            self.guests.record(key, id);
        }
    }
}

async fn load_row(
    conn: &mut PgConnection,
    row: &LoadedRow,
    caches: &Caches,
    pending: &mut Pending,
) -> Result<(), AppError> {
    let hotel_id = match caches.hotels.get(&row.hotel) {
        Some(id) => id,
        None => {
            let id = resolve_or_create(&mut PgHotelKeys::new(&mut *conn), &row.hotel)
                .await?
                .id;
            pending.hotels.push((row.hotel.clone(), id));
            id
        }
    };
    let guest_id = match caches.guests.get(&row.guest) {
        Some(id) => id,
        None => {
            let id = resolve_or_create(&mut PgGuestKeys::new(&mut *conn), &row.guest)
                .await?
                .id;
            pending.guests.push((row.guest.clone(), id));
            id
        }
    };
    insert_booking(conn, hotel_id, guest_id, &row.attributes).await?;
    Ok(())
}

/// Loads `path` into the relational store, committing every `batch_size`
/// rows. Each row runs under its own savepoint.
pub async fn load_relational(pool: &PgPool, path: &Path, batch_size: usize) -> Result<LoadSummary> {
    let batch_size = batch_size.max(1);
    let mut reader = open_csv(path)?;
    let mut summary = LoadSummary::default();
    let mut caches = Caches {
        hotels: KeyCache::new(),
        guests: KeyCache::new(),
    };
    let mut pending = Pending::default();
    let mut in_batch = 0usize;

    let mut tx = pool.begin().await.context("Failed to open batch transaction")?;

    for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row_num = index + 1;
        let row = match read_row(record) {
            Ok(row) => row,
            Err(e) => {
                warn!("Error processing row {row_num}: {e}");
                summary.failed += 1;
                continue;
            }
        };

        let mut savepoint = tx.begin().await.context("Failed to open row savepoint")?;
        let mut row_pending = Pending::default();
        match load_row(&mut savepoint, &row, &caches, &mut row_pending).await {
            Ok(()) => {
                savepoint.commit().await.context("Failed to release row savepoint")?;
                pending.hotels.append(&mut row_pending.hotels);
                pending.guests.append(&mut row_pending.guests);
                summary.inserted += 1;
                in_batch += 1;
            }
            Err(e) => {
                warn!("Error processing row {row_num}: {e}");
                savepoint
                    .rollback()
                    .await
                    .context("Failed to roll back row savepoint")?;
                summary.failed += 1;
            }
        }

        if in_batch >= batch_size {
            tx.commit().await.context("Failed to commit batch")?;
            caches.absorb(&mut pending);
            info!("Inserted {} records so far...", summary.inserted);
            in_batch = 0;
            tx = pool.begin().await.context("Failed to open batch transaction")?;
        }
    }

    tx.commit().await.context("Failed to commit final batch")?;
    caches.absorb(&mut pending);

    summary.hotels = count(pool, "SELECT COUNT(*) FROM hotels").await?;
    summary.guests = count(pool, "SELECT COUNT(*) FROM guests").await?;
    summary.bookings = count(pool, "SELECT COUNT(*) FROM bookings").await?;
    Ok(summary)
}

async fn count(pool: &PgPool, sql: &str) -> Result<i64> {
    sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to run {sql}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::loader::tests::sample_csv;

    fn csv_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_csv().as_bytes()).unwrap();
        file
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_bad_row_is_skipped_not_fatal(pool: PgPool) {
        let file = csv_file();
        let summary = load_relational(&pool, file.path(), 2).await.unwrap();
        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.bookings, 4);
        assert_eq!(summary.hotels, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_reload_duplicates_bookings_only(pool: PgPool) {
        let file = csv_file();
        let first = load_relational(&pool, file.path(), 1000).await.unwrap();
        let second = load_relational(&pool, file.path(), 1000).await.unwrap();
        assert_eq!(second.bookings, first.bookings * 2);
        assert_eq!(second.hotels, first.hotels);
        assert_eq!(second.guests, first.guests);
    }
}
