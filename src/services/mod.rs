//! Business logic services

pub mod bookings;
pub mod items;
pub mod requests;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub bookings: bookings::BookingsService,
    pub requests: requests::RequestsService,
    pool: Pool<Postgres>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone()),
            pool: repository.pool.clone(),
            requests: requests::RequestsService::new(repository),
        }
    }

    /// Database pool handle, used by the readiness probe
    pub fn pool(&self) -> Pool<Postgres> {
        self.pool.clone()
    }
}

/// Validate offset/limit paging parameters
pub(crate) fn check_page(from: i64, size: i64) -> AppResult<()> {
    if from < 0 {
        return Err(AppError::BadRequest(format!(
            "Parameter from must not be negative, got {}",
            from
        )));
    }
    if size < 1 {
        return Err(AppError::BadRequest(format!(
            "Parameter size must be positive, got {}",
            size
        )));
    }
    Ok(())
}
