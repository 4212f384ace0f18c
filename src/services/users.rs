//! User account service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new user account
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        self.repository.users.create(&user).await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Partial update: omitted fields keep their stored values
    pub async fn update(&self, id: i64, patch: UpdateUser) -> AppResult<User> {
        let existing = self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = patch.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let merged = patch.merge_into(existing);
        self.repository.users.update(&merged).await
    }

    /// Delete a user and, via cascade, everything they own
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.users.exists(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        self.repository.users.delete(id).await
    }
}
