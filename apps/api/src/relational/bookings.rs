use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::booking::{
    BookingAttributes, BookingCreate, BookingRow, BookingUpdate, FieldPatch, PatchValue,
};
use crate::repository::{Created, Page, Repository};

const INSERT_BOOKING: &str = r#"
    INSERT INTO bookings (
        hotel_id, guest_id, lead_time, arrival_date_year,
        arrival_date_month, arrival_date_week_number,
        arrival_date_day_of_month, stays_in_weekend_nights,
        stays_in_week_nights, adults, children, babies,
        meal, market_segment, distribution_channel,
        previous_cancellations, previous_bookings_not_canceled,
        reserved_room_type, assigned_room_type, booking_changes,
        deposit_type, agent, company, days_in_waiting_list,
        adr, required_car_parking_spaces, total_of_special_requests,
        is_canceled, reservation_status, reservation_status_date
    ) VALUES (
        $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
        $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30
    )
    RETURNING *
"#;

#[derive(Debug, FromRow)]
struct ValidationOutcome {
    is_valid: bool,
    message: String,
}

/// Inserts one booking row on the given connection. No existence or
/// invariant checks; callers decide what to verify first.
pub async fn insert_booking(
    conn: &mut PgConnection,
    hotel_id: i64,
    guest_id: i64,
    a: &BookingAttributes,
) -> Result<BookingRow, AppError> {
    Ok(sqlx::query_as::<_, BookingRow>(INSERT_BOOKING)
        .bind(hotel_id)
        .bind(guest_id)
        .bind(a.lead_time)
        .bind(a.arrival_date_year)
        .bind(&a.arrival_date_month)
        .bind(a.arrival_date_week_number)
        .bind(a.arrival_date_day_of_month)
        .bind(a.stays_in_weekend_nights)
        .bind(a.stays_in_week_nights)
        .bind(a.adults)
        .bind(a.children)
        .bind(a.babies)
        .bind(&a.meal)
        .bind(&a.market_segment)
        .bind(&a.distribution_channel)
        .bind(a.previous_cancellations)
        .bind(a.previous_bookings_not_canceled)
        .bind(&a.reserved_room_type)
        .bind(&a.assigned_room_type)
        .bind(a.booking_changes)
        .bind(&a.deposit_type)
        .bind(a.agent)
        .bind(a.company)
        .bind(a.days_in_waiting_list)
        .bind(a.adr)
        .bind(a.required_car_parking_spaces)
        .bind(a.total_of_special_requests)
        .bind(a.is_canceled)
        .bind(&a.reservation_status)
        .bind(a.reservation_status_date)
        .fetch_one(conn)
        .await?)
}

#[derive(Clone)]
pub struct PgBookings {
    pool: PgPool,
}

impl PgBookings {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paged listing with an optional `is_canceled` filter.
    pub async fn list_filtered(
        &self,
        page: Page,
        is_canceled: Option<bool>,
    ) -> Result<Vec<BookingRow>, AppError> {
        Ok(sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::BOOLEAN IS NULL OR is_canceled = $1)
            ORDER BY booking_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(is_canceled)
        .bind(i64::from(page.limit))
        .bind(i64::from(page.skip))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn exists(conn: &mut PgConnection, sql: &str, id: i64) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl Repository for PgBookings {
    type Id = i64;
    type Record = BookingRow;
    type Create = BookingCreate<i64>;
    type Update = BookingUpdate;

    async fn list(&self, page: Page) -> Result<Vec<BookingRow>, AppError> {
        self.list_filtered(page, None).await
    }

    async fn find(&self, id: &i64) -> Result<BookingRow, AppError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE booking_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))
    }

    /// Checks references, runs `validate_booking()`, then inserts, all in one
    /// transaction. Dropping `tx` on any early return rolls everything back.
    async fn create(&self, input: BookingCreate<i64>) -> Result<Created<BookingRow>, AppError> {
        input.attributes.validate()?;
        let BookingCreate {
            hotel_id,
            guest_id,
            attributes,
        } = input;

        let mut tx = self.pool.begin().await?;

        // FOR SHARE keeps the referenced rows from being deleted mid-insert
        if !Self::exists(
            &mut tx,
            "SELECT hotel_id FROM hotels WHERE hotel_id = $1 FOR SHARE",
            hotel_id,
        )
        .await?
        {
            return Err(AppError::NotFound(format!("Hotel {hotel_id} not found")));
        }
        if !Self::exists(
            &mut tx,
            "SELECT guest_id FROM guests WHERE guest_id = $1 FOR SHARE",
            guest_id,
        )
        .await?
        {
            return Err(AppError::NotFound(format!("Guest {guest_id} not found")));
        }

        let outcome = sqlx::query_as::<_, ValidationOutcome>(
            "SELECT is_valid, message FROM validate_booking($1, $2, $3, $4)",
        )
        .bind(attributes.lead_time)
        .bind(attributes.adults)
        .bind(attributes.is_canceled)
        .bind(&attributes.reservation_status)
        .fetch_one(&mut *tx)
        .await?;
        if !outcome.is_valid {
            warn!("Rejected booking for hotel {hotel_id}: {}", outcome.message);
            return Err(AppError::Validation(outcome.message));
        }

        let row = insert_booking(&mut tx, hotel_id, guest_id, &attributes).await?;
        tx.commit().await?;

        info!("Created booking {} (hotel {hotel_id}, guest {guest_id})", row.booking_id);
        Ok(Created::New(row))
    }

    async fn update(&self, id: &i64, input: BookingUpdate) -> Result<BookingRow, AppError> {
        let patch = FieldPatch::try_from(input)?;

        let mut query = update_statement(&patch, *id);
        query
            .build_query_as::<BookingRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))
    }

    async fn delete(&self, id: &i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking {id} not found")));
        }
        Ok(())
    }
}

/// `UPDATE bookings SET <patched columns> WHERE booking_id = $n RETURNING *`.
/// Column names come from the whitelist enum; every value is a bind.
fn update_statement(patch: &FieldPatch, id: i64) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE bookings SET ");
    let mut set = query.separated(", ");
    for (column, value) in patch.iter() {
        set.push(column.column_name());
        set.push_unseparated(" = ");
        match value {
            PatchValue::Text(v) => set.push_bind_unseparated(v.clone()),
            PatchValue::Bool(v) => set.push_bind_unseparated(*v),
            PatchValue::Int(v) => set.push_bind_unseparated(*v),
            PatchValue::Float(v) => set.push_bind_unseparated(*v),
        };
    }
    query.push(" WHERE booking_id = ");
    query.push_bind(id);
    query.push(" RETURNING *");
    query
}
