//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingStatus, State},
};

const BOOKING_COLUMNS: &str = "id, item_id, booker_id, start_date, end_date, status";

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Get a booking visible to the given user: the user must be either
    /// the booker or the owner of the booked item.
    pub async fn find_for_participant(
        &self,
        booking_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT b.id, b.item_id, b.booker_id, b.start_date, b.end_date, b.status \
             FROM bookings b \
             JOIN items i ON b.item_id = i.id \
             WHERE b.id = $1 AND (b.booker_id = $2 OR i.owner_id = $2)",
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Create a new booking in WAITING status
    pub async fn create(
        &self,
        item_id: i64,
        booker_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let created = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (item_id, booker_id, start_date, end_date, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            BOOKING_COLUMNS
        ))
        .bind(item_id)
        .bind(booker_id)
        .bind(start)
        .bind(end)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Overwrite a booking's status. Runs in its own transaction.
    pub async fn update_status(&self, booking_id: i64, status: BookingStatus) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
            .bind(booking_id)
            .bind(status)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// List a booker's bookings sliced by state, newest start first
    pub async fn find_by_booker(
        &self,
        booker_id: i64,
        state: State,
        now: DateTime<Utc>,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<Booking>> {
        self.find_sliced("b.booker_id = $1", booker_id, state, now, from, size)
            .await
    }

    /// List bookings on a user's items sliced by state, newest start first
    pub async fn find_by_owner(
        &self,
        owner_id: i64,
        state: State,
        now: DateTime<Utc>,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<Booking>> {
        self.find_sliced("i.owner_id = $1", owner_id, state, now, from, size)
            .await
    }

    /// Shared state-filter dispatch. Each state maps to one bounded
    /// predicate over the same subject clause.
    async fn find_sliced(
        &self,
        subject: &str,
        subject_id: i64,
        state: State,
        now: DateTime<Utc>,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<Booking>> {
        let base = format!(
            "SELECT b.id, b.item_id, b.booker_id, b.start_date, b.end_date, b.status \
             FROM bookings b \
             JOIN items i ON b.item_id = i.id \
             WHERE {}",
            subject
        );
        let tail = "ORDER BY b.start_date DESC OFFSET $3 LIMIT $4";

        let bookings = match state {
            State::All => {
                let sql = format!("{} ORDER BY b.start_date DESC OFFSET $2 LIMIT $3", base);
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(subject_id)
                    .bind(from)
                    .bind(size)
                    .fetch_all(&self.pool)
                    .await?
            }
            State::Current => {
                let sql = format!("{} AND b.start_date < $2 AND b.end_date > $2 {}", base, tail);
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(subject_id)
                    .bind(now)
                    .bind(from)
                    .bind(size)
                    .fetch_all(&self.pool)
                    .await?
            }
            State::Past => {
                let sql = format!("{} AND b.end_date < $2 {}", base, tail);
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(subject_id)
                    .bind(now)
                    .bind(from)
                    .bind(size)
                    .fetch_all(&self.pool)
                    .await?
            }
            State::Future => {
                let sql = format!("{} AND b.start_date > $2 {}", base, tail);
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(subject_id)
                    .bind(now)
                    .bind(from)
                    .bind(size)
                    .fetch_all(&self.pool)
                    .await?
            }
            State::Waiting | State::Rejected => {
                let status = if state == State::Waiting {
                    BookingStatus::Waiting
                } else {
                    BookingStatus::Rejected
                };
                let sql = format!("{} AND b.status = $2 {}", base, tail);
                sqlx::query_as::<_, Booking>(&sql)
                    .bind(subject_id)
                    .bind(status)
                    .bind(from)
                    .bind(size)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(bookings)
    }

    /// All non-rejected bookings of one item, used for the owner's
    /// last/next summary
    pub async fn find_active_by_item(&self, item_id: i64) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE item_id = $1 AND status != $2 ORDER BY start_date",
            BOOKING_COLUMNS
        ))
        .bind(item_id)
        .bind(BookingStatus::Rejected)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// All non-rejected bookings across a set of items
    pub async fn find_active_by_items(&self, item_ids: &[i64]) -> AppResult<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE item_id = ANY($1) AND status != $2 ORDER BY start_date",
            BOOKING_COLUMNS
        ))
        .bind(item_ids)
        .bind(BookingStatus::Rejected)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// True when the user has an approved booking of the item that
    /// already finished, i.e. they actually rented it.
    pub async fn has_completed_booking(
        &self,
        item_id: i64,
        booker_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookings \
             WHERE item_id = $1 AND booker_id = $2 AND status = $3 AND end_date < $4)",
        )
        .bind(item_id)
        .bind(booker_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
