use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::identity::resolve_or_create;
use crate::models::hotel::{HotelKey, HotelRow};
use crate::relational::keys::PgHotelKeys;
use crate::repository::{Created, Page, Repository};

#[derive(Clone)]
pub struct PgHotels {
    pool: PgPool,
}

impl PgHotels {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgHotels {
    type Id = i64;
    type Record = HotelRow;
    type Create = HotelKey;
    type Update = HotelKey;

    async fn list(&self, page: Page) -> Result<Vec<HotelRow>, AppError> {
        Ok(sqlx::query_as::<_, HotelRow>(
            "SELECT * FROM hotels ORDER BY hotel_id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: &i64) -> Result<HotelRow, AppError> {
        sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels WHERE hotel_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hotel {id} not found")))
    }

    async fn create(&self, input: HotelKey) -> Result<Created<HotelRow>, AppError> {
        input.validate()?;
        let mut conn = self.pool.acquire().await?;
        let resolved = resolve_or_create(&mut PgHotelKeys::new(&mut conn), &input).await?;
        drop(conn);

        let row = self.find(&resolved.id).await?;
        if resolved.created {
            info!("Created hotel {} ({})", row.hotel_id, row.hotel_name);
            Ok(Created::New(row))
        } else {
            Ok(Created::Existing(row))
        }
    }

    async fn update(&self, id: &i64, input: HotelKey) -> Result<HotelRow, AppError> {
        input.validate()?;
        sqlx::query_as::<_, HotelRow>(
            "UPDATE hotels SET hotel_name = $1 WHERE hotel_id = $2 RETURNING *",
        )
        .bind(&input.hotel_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hotel {id} not found")))
    }

    async fn delete(&self, id: &i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM hotels WHERE hotel_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Hotel {id} not found")));
        }
        Ok(())
    }
}
