use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::identity::resolve_or_create;
use crate::models::guest::{GuestKey, GuestRow};
use crate::relational::keys::PgGuestKeys;
use crate::repository::{Created, Page, Repository};

#[derive(Clone)]
pub struct PgGuests {
    pool: PgPool,
}

impl PgGuests {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgGuests {
    type Id = i64;
    type Record = GuestRow;
    type Create = GuestKey;
    type Update = GuestKey;

    async fn list(&self, page: Page) -> Result<Vec<GuestRow>, AppError> {
        Ok(sqlx::query_as::<_, GuestRow>(
            "SELECT * FROM guests ORDER BY guest_id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: &i64) -> Result<GuestRow, AppError> {
        sqlx::query_as::<_, GuestRow>("SELECT * FROM guests WHERE guest_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Guest {id} not found")))
    }

    async fn create(&self, input: GuestKey) -> Result<Created<GuestRow>, AppError> {
        input.validate()?;
        let mut conn = self.pool.acquire().await?;
        let resolved = resolve_or_create(&mut PgGuestKeys::new(&mut conn), &input).await?;
        drop(conn);

        let row = self.find(&resolved.id).await?;
        if resolved.created {
            info!(
                "Created guest {} ({}, repeated={}, {})",
                row.guest_id, row.country, row.is_repeated_guest, row.customer_type
            );
            Ok(Created::New(row))
        } else {
            Ok(Created::Existing(row))
        }
    }

    async fn update(&self, id: &i64, input: GuestKey) -> Result<GuestRow, AppError> {
        input.validate()?;
        sqlx::query_as::<_, GuestRow>(
            r#"
            UPDATE guests
            SET country = $1, is_repeated_guest = $2, customer_type = $3
            WHERE guest_id = $4
            RETURNING *
            "#,
        )
        .bind(&input.country)
        .bind(input.is_repeated_guest)
        .bind(&input.customer_type)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Guest {id} not found")))
    }

    async fn delete(&self, id: &i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM guests WHERE guest_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Guest {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::tests::sample_attributes;
    use crate::models::booking::BookingCreate;
    use crate::models::hotel::HotelKey;
    use crate::relational::{PgBookings, PgHotels};

    fn key() -> GuestKey {
        GuestKey {
            country: "TST".to_string(),
            is_repeated_guest: false,
            customer_type: "Transient".to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_recreate_returns_existing_id(pool: PgPool) {
        let guests = PgGuests::new(pool);
        let first = guests.create(key()).await.unwrap();
        let second = guests.create(key()).await.unwrap();
        assert!(!second.is_new());
        assert_eq!(first.record().guest_id, second.record().guest_id);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_referenced_guest_cannot_be_deleted(pool: PgPool) {
        let guest_id = PgGuests::new(pool.clone())
            .create(key())
            .await
            .unwrap()
            .record()
            .guest_id;
        let hotel_id = PgHotels::new(pool.clone())
            .create(HotelKey::new("City Hotel"))
            .await
            .unwrap()
            .record()
            .hotel_id;
        PgBookings::new(pool.clone())
            .create(BookingCreate {
                hotel_id,
                guest_id,
                attributes: sample_attributes(),
            })
            .await
            .unwrap();

        let err = PgGuests::new(pool).delete(&guest_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
