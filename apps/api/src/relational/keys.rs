use async_trait::async_trait;
use sqlx::PgConnection;

use crate::errors::AppError;
use crate::identity::NaturalKeyStore;
use crate::models::guest::GuestKey;
use crate::models::hotel::HotelKey;

/// Hotel natural-key lookups on a borrowed connection, so the loader can run
/// them inside its batch transaction.
pub struct PgHotelKeys<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgHotelKeys<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl NaturalKeyStore for PgHotelKeys<'_> {
    type Key = HotelKey;
    type Id = i64;

    async fn find_by_key(&mut self, key: &HotelKey) -> Result<Option<i64>, AppError> {
        Ok(
            sqlx::query_scalar("SELECT hotel_id FROM hotels WHERE hotel_name = $1")
                .bind(&key.hotel_name)
                .fetch_optional(&mut *self.conn)
                .await?,
        )
    }

    async fn insert(&mut self, key: &HotelKey) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("INSERT INTO hotels (hotel_name) VALUES ($1) RETURNING hotel_id")
                .bind(&key.hotel_name)
                .fetch_one(&mut *self.conn)
                .await?,
        )
    }
}

pub struct PgGuestKeys<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgGuestKeys<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl NaturalKeyStore for PgGuestKeys<'_> {
    type Key = GuestKey;
    type Id = i64;

    async fn find_by_key(&mut self, key: &GuestKey) -> Result<Option<i64>, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT guest_id FROM guests
            WHERE country = $1 AND is_repeated_guest = $2 AND customer_type = $3
            LIMIT 1
            "#,
        )
        .bind(&key.country)
        .bind(key.is_repeated_guest)
        .bind(&key.customer_type)
        .fetch_optional(&mut *self.conn)
        .await?)
    }

    async fn insert(&mut self, key: &GuestKey) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar(
            r#"
            INSERT INTO guests (country, is_repeated_guest, customer_type)
            VALUES ($1, $2, $3)
            RETURNING guest_id
            "#,
        )
        .bind(&key.country)
        .bind(key.is_repeated_guest)
        .bind(&key.customer_type)
        .fetch_one(&mut *self.conn)
        .await?)
    }
}
