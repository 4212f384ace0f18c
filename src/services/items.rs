//! Item lifecycle, search, comments and the owner's booking summary

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingShort},
        item::{CommentOut, CreateComment, CreateItem, Item, ItemOut, UpdateItem},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a new item
    pub async fn add_item(&self, owner_id: i64, item: CreateItem) -> AppResult<ItemOut> {
        if !self.repository.users.exists(owner_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        if let Some(request_id) = item.request_id {
            if !self.repository.requests.exists(request_id).await? {
                return Err(AppError::NotFound("Request not found".to_string()));
            }
        }
        let created = self
            .repository
            .items
            .create(
                owner_id,
                &item.name,
                &item.description,
                item.available,
                item.request_id,
            )
            .await?;
        Ok(ItemOut::from(created))
    }

    /// Fetch one item. Everyone sees its comments; only the owner sees
    /// the last/next booking summary.
    pub async fn get_by_id(&self, item_id: i64, caller_id: i64) -> AppResult<ItemOut> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if !self.repository.users.exists(caller_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        let comments = self.repository.comments.find_by_item(item_id).await?;
        let is_owner = item.owner_id == caller_id;

        let mut out = ItemOut::from(item);
        out.comments = comments.into_iter().map(CommentOut::from).collect();

        if is_owner {
            let bookings = self.repository.bookings.find_active_by_item(item_id).await?;
            let (last, next) = booking_summary(&bookings, Utc::now());
            out.last_booking = last;
            out.next_booking = next;
        }

        Ok(out)
    }

    /// Partial update, owner only
    pub async fn update_item(
        &self,
        item_id: i64,
        caller_id: i64,
        patch: UpdateItem,
    ) -> AppResult<ItemOut> {
        let existing = self.repository.items.get_by_id(item_id).await?;
        if !self.repository.users.exists(caller_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        if existing.owner_id != caller_id {
            return Err(AppError::Forbidden(
                "Only the owner may edit this item".to_string(),
            ));
        }
        if let Some(request_id) = patch.request_id {
            if !self.repository.requests.exists(request_id).await? {
                return Err(AppError::NotFound("Request not found".to_string()));
            }
        }

        let merged = patch.merge_into(existing);
        let updated = self.repository.items.update(&merged).await?;
        Ok(ItemOut::from(updated))
    }

    /// The owner's items, each enriched with comments and the booking
    /// summary. The caller is implicitly the owner here.
    pub async fn get_all_by_owner(
        &self,
        owner_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemOut>> {
        super::check_page(from, size)?;

        let items = self.repository.items.find_by_owner(owner_id, from, size).await?;
        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();

        let mut bookings_by_item: HashMap<i64, Vec<Booking>> = HashMap::new();
        for booking in self.repository.bookings.find_active_by_items(&item_ids).await? {
            bookings_by_item.entry(booking.item_id).or_default().push(booking);
        }

        let mut comments_by_item: HashMap<i64, Vec<CommentOut>> = HashMap::new();
        for comment in self.repository.comments.find_by_items(&item_ids).await? {
            comments_by_item
                .entry(comment.item_id)
                .or_default()
                .push(CommentOut::from(comment));
        }

        let now = Utc::now();
        let result = items
            .into_iter()
            .map(|item: Item| {
                let id = item.id;
                let mut out = ItemOut::from(item);
                let bookings = bookings_by_item.remove(&id).unwrap_or_default();
                let (last, next) = booking_summary(&bookings, now);
                out.last_booking = last;
                out.next_booking = next;
                out.comments = comments_by_item.remove(&id).unwrap_or_default();
                out
            })
            .collect();

        Ok(result)
    }

    /// Case-insensitive substring search over available items. An empty
    /// or absent query yields an empty list, not an error.
    pub async fn search(
        &self,
        text: Option<&str>,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemOut>> {
        super::check_page(from, size)?;
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(Vec::new()),
        };

        let items = self.repository.items.search(text, from, size).await?;
        Ok(items.into_iter().map(ItemOut::from).collect())
    }

    /// Leave a review. Only a user whose approved booking of the item
    /// already ended may comment.
    pub async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<CommentOut> {
        if !self.repository.users.exists(author_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        if !self.repository.items.exists(item_id).await? {
            return Err(AppError::NotFound("Item not found".to_string()));
        }

        let now = Utc::now();
        let rented = self
            .repository
            .bookings
            .has_completed_booking(item_id, author_id, now)
            .await?;
        if !rented {
            return Err(AppError::BadRequest("User did not rent item".to_string()));
        }

        let created = self
            .repository
            .comments
            .create(item_id, author_id, &comment.text, now)
            .await?;
        Ok(CommentOut::from(created))
    }
}

/// Derive the owner-facing booking summary from an item's non-rejected
/// bookings: `last` is the latest booking already started, `next` the
/// earliest one still ahead.
fn booking_summary(
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> (Option<BookingShort>, Option<BookingShort>) {
    let last = bookings
        .iter()
        .filter(|b| b.start_date < now)
        .max_by_key(|b| b.start_date)
        .map(BookingShort::from);
    let next = bookings
        .iter()
        .filter(|b| b.start_date > now)
        .min_by_key(|b| b.start_date)
        .map(BookingShort::from);
    (last, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::Duration;

    fn booking(id: i64, start_offset_hours: i64) -> Booking {
        let now = fixed_now();
        Booking {
            id,
            item_id: 1,
            booker_id: 2,
            start_date: now + Duration::hours(start_offset_hours),
            end_date: now + Duration::hours(start_offset_hours + 1),
            status: BookingStatus::Approved,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_input_yields_no_summary() {
        let (last, next) = booking_summary(&[], fixed_now());
        assert!(last.is_none());
        assert!(next.is_none());
    }

    #[test]
    fn picks_latest_past_and_earliest_future() {
        let bookings = vec![booking(1, -48), booking(2, -2), booking(3, 3), booking(4, 24)];
        let (last, next) = booking_summary(&bookings, fixed_now());
        assert_eq!(last.unwrap().id, 2);
        assert_eq!(next.unwrap().id, 3);
    }

    #[test]
    fn only_past_bookings_leave_next_empty() {
        let bookings = vec![booking(1, -10), booking(2, -5)];
        let (last, next) = booking_summary(&bookings, fixed_now());
        assert_eq!(last.unwrap().id, 2);
        assert!(next.is_none());
    }

    #[test]
    fn only_future_bookings_leave_last_empty() {
        let bookings = vec![booking(1, 5), booking(2, 10)];
        let (last, next) = booking_summary(&bookings, fixed_now());
        assert!(last.is_none());
        assert_eq!(next.unwrap().id, 1);
    }

    #[test]
    fn summary_straddles_now() {
        // lastBooking.start < now <= nextBooking.start whenever both exist
        let bookings = vec![booking(1, -1), booking(2, 1)];
        let now = fixed_now();
        let (last, next) = booking_summary(&bookings, now);
        let (last, next) = (last.unwrap(), next.unwrap());
        assert!(last.start < now);
        assert!(next.start > now);
    }
}
