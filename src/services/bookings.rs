//! Booking lifecycle and state-filtered listings

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingOut, BookingStatus, CreateBooking, State},
        item::ItemOut,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book a time window on an item. The booking starts out WAITING for
    /// the owner's decision.
    pub async fn create(&self, booker_id: i64, booking: CreateBooking) -> AppResult<BookingOut> {
        check_dates(booking.start, booking.end)?;

        let item = self.repository.items.get_by_id(booking.item_id).await?;
        let booker = self.repository.users.get_by_id(booker_id).await?;

        if !item.available {
            return Err(AppError::BadRequest(
                "Booking is not available".to_string(),
            ));
        }
        // Self-booking is reported as NotFound on purpose: the response
        // must not confirm the item exists.
        if item.owner_id == booker_id {
            return Err(AppError::NotFound("Item not found".to_string()));
        }

        let created = self
            .repository
            .bookings
            .create(item.id, booker_id, booking.start, booking.end)
            .await?;

        Ok(BookingOut {
            id: created.id,
            start: created.start_date,
            end: created.end_date,
            status: created.status,
            booker,
            item: ItemOut::from(item),
        })
    }

    /// Fetch one booking, visible only to its booker or the item's owner
    pub async fn get_booking(&self, caller_id: i64, booking_id: i64) -> AppResult<BookingOut> {
        let booking = self
            .repository
            .bookings
            .find_for_participant(booking_id, caller_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
        self.assemble(booking).await
    }

    /// List the caller's own bookings sliced by state
    pub async fn get_user_bookings(
        &self,
        booker_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingOut>> {
        let state = parse_state(state)?;
        super::check_page(from, size)?;
        if !self.repository.users.exists(booker_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let bookings = self
            .repository
            .bookings
            .find_by_booker(booker_id, state, Utc::now(), from, size)
            .await?;
        self.assemble_many(bookings).await
    }

    /// List bookings made on the caller's items sliced by state
    pub async fn get_owner_bookings(
        &self,
        owner_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingOut>> {
        let state = parse_state(state)?;
        super::check_page(from, size)?;
        if !self.repository.users.exists(owner_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let bookings = self
            .repository
            .bookings
            .find_by_owner(owner_id, state, Utc::now(), from, size)
            .await?;
        self.assemble_many(bookings).await
    }

    /// Owner's decision on a WAITING booking. An APPROVED booking is
    /// terminal and cannot be decided again.
    pub async fn update_status(
        &self,
        caller_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> AppResult<BookingOut> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if booking.status == BookingStatus::Approved {
            return Err(AppError::BadRequest("Item already booked.".to_string()));
        }

        if !self
            .repository
            .items
            .is_owned_by(booking.item_id, caller_id)
            .await?
        {
            return Err(AppError::NotFound("Item not found".to_string()));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };
        self.repository.bookings.update_status(booking_id, status).await?;

        self.assemble(Booking { status, ..booking }).await
    }

    /// Attach the nested booker and item to a stored booking
    async fn assemble(&self, booking: Booking) -> AppResult<BookingOut> {
        let item = self.repository.items.get_by_id(booking.item_id).await?;
        let booker = self.repository.users.get_by_id(booking.booker_id).await?;
        Ok(BookingOut {
            id: booking.id,
            start: booking.start_date,
            end: booking.end_date,
            status: booking.status,
            booker,
            item: ItemOut::from(item),
        })
    }

    async fn assemble_many(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingOut>> {
        let mut result = Vec::with_capacity(bookings.len());
        for booking in bookings {
            result.push(self.assemble(booking).await?);
        }
        Ok(result)
    }
}

fn parse_state(state: &str) -> AppResult<State> {
    state
        .parse::<State>()
        .map_err(AppError::BadRequest)
}

/// A booking window must be a non-empty forward interval
fn check_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end < start {
        return Err(AppError::BadRequest(
            "The booking end date cannot be earlier than the start date".to_string(),
        ));
    }
    if end == start {
        return Err(AppError::BadRequest("Same dates".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = check_dates(t0(), t0() - Duration::hours(1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn zero_length_window_is_rejected() {
        let err = check_dates(t0(), t0()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn forward_window_is_accepted() {
        assert!(check_dates(t0(), t0() + Duration::minutes(1)).is_ok());
    }

    #[test]
    fn unknown_state_maps_to_bad_request() {
        let err = parse_state("EVENTUALLY").unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Unknown state: EVENTUALLY"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
