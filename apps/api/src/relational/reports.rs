use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::log::BookingLogRow;
use crate::models::statistics::BookingStatistics;
use crate::repository::Page;

/// Aggregate summary computed server-side by `get_booking_statistics()`.
pub async fn booking_statistics(pool: &PgPool) -> Result<BookingStatistics, AppError> {
    Ok(
        sqlx::query_as::<_, BookingStatistics>("SELECT * FROM get_booking_statistics()")
            .fetch_one(pool)
            .await?,
    )
}

/// Audit trail, newest first.
pub async fn booking_logs(pool: &PgPool, page: Page) -> Result<Vec<BookingLogRow>, AppError> {
    Ok(sqlx::query_as::<_, BookingLogRow>(
        r#"
        SELECT * FROM booking_logs
        ORDER BY changed_at DESC, log_id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(i64::from(page.limit))
    .bind(i64::from(page.skip))
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::tests::sample_attributes;
    use crate::models::booking::{BookingCreate, BookingUpdate};
    use crate::models::guest::GuestKey;
    use crate::models::hotel::HotelKey;
    use crate::relational::{PgBookings, PgGuests, PgHotels};
    use crate::repository::Repository;

    async fn guest(pool: &PgPool, country: &str) -> i64 {
        PgGuests::new(pool.clone())
            .create(GuestKey {
                country: country.to_string(),
                is_repeated_guest: false,
                customer_type: "Transient".to_string(),
            })
            .await
            .unwrap()
            .record()
            .guest_id
    }

    async fn hotel(pool: &PgPool) -> i64 {
        PgHotels::new(pool.clone())
            .create(HotelKey::new("City Hotel"))
            .await
            .unwrap()
            .record()
            .hotel_id
    }

    async fn book(pool: &PgPool, hotel_id: i64, guest_id: i64, adr: f64, canceled: bool) -> i64 {
        let mut attributes = sample_attributes();
        attributes.adr = adr;
        attributes.is_canceled = canceled;
        if canceled {
            attributes.reservation_status = "Canceled".to_string();
        }
        PgBookings::new(pool.clone())
            .create(BookingCreate {
                hotel_id,
                guest_id,
                attributes,
            })
            .await
            .unwrap()
            .record()
            .booking_id
    }

    async fn set_status(pool: &PgPool, booking_id: i64, status: &str, canceled: bool) {
        PgBookings::new(pool.clone())
            .update(
                &booking_id,
                BookingUpdate {
                    reservation_status: Some(status.to_string()),
                    is_canceled: Some(canceled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_statistics_are_rounded_percentages(pool: PgPool) {
        let hotel_id = hotel(&pool).await;
        let gbr = guest(&pool, "GBR").await;
        let prt = guest(&pool, "PRT").await;
        book(&pool, hotel_id, gbr, 40.0, true).await;
        book(&pool, hotel_id, gbr, 60.0, true).await;
        book(&pool, hotel_id, prt, 60.0, false).await;

        let stats = booking_statistics(&pool).await.unwrap();
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.cancellation_rate, 66.67);
        assert_eq!(stats.avg_adr, 53.33);
        assert_eq!(stats.most_common_country.as_deref(), Some("GBR"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_country_tie_breaks_alphabetically(pool: PgPool) {
        let hotel_id = hotel(&pool).await;
        let prt = guest(&pool, "PRT").await;
        let gbr = guest(&pool, "GBR").await;
        book(&pool, hotel_id, prt, 100.0, false).await;
        book(&pool, hotel_id, gbr, 100.0, false).await;

        let stats = booking_statistics(&pool).await.unwrap();
        assert_eq!(stats.cancellation_rate, 0.0);
        assert_eq!(stats.avg_adr, 100.0);
        assert_eq!(stats.most_common_country.as_deref(), Some("GBR"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_logs_are_newest_first(pool: PgPool) {
        let hotel_id = hotel(&pool).await;
        let guest_id = guest(&pool, "PRT").await;
        let first = book(&pool, hotel_id, guest_id, 80.0, false).await;
        let second = book(&pool, hotel_id, guest_id, 80.0, false).await;

        set_status(&pool, first, "Canceled", true).await;
        set_status(&pool, second, "No-Show", true).await;
        set_status(&pool, second, "Check-Out", false).await;

        let logs = booking_logs(&pool, Page::default()).await.unwrap();
        let order: Vec<_> = logs
            .iter()
            .map(|log| (log.booking_id, log.new_status.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                (second, Some("Check-Out")),
                (second, Some("No-Show")),
                (first, Some("Canceled")),
            ]
        );
        assert!(logs.windows(2).all(|w| w[0].log_id > w[1].log_id));
        assert_eq!(logs[2].old_is_canceled, Some(false));

        let page = booking_logs(&pool, Page::new(1, 1)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].log_id, logs[1].log_id);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_statistics_on_empty_tables(pool: PgPool) {
        let stats = booking_statistics(&pool).await.unwrap();
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.cancellation_rate, 0.0);
        assert_eq!(stats.avg_adr, 0.0);
        assert!(stats.most_common_country.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn test_logs_empty_without_status_changes(pool: PgPool) {
        let logs = booking_logs(&pool, Page::default()).await.unwrap();
        assert!(logs.is_empty());
    }
}
