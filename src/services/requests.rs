//! Wanted-item request service

use std::collections::HashMap;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::ItemOut,
        request::{CreateItemRequest, ItemRequest, ItemRequestOut},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Post a new wanted-item request
    pub async fn create(
        &self,
        requester_id: i64,
        request: CreateItemRequest,
    ) -> AppResult<ItemRequestOut> {
        if !self.repository.users.exists(requester_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let created = self
            .repository
            .requests
            .create(requester_id, &request.description, Utc::now())
            .await?;
        Ok(ItemRequestOut::new(created, Vec::new()))
    }

    /// The caller's own requests, each with the items listed against it
    pub async fn find_all_by_user(&self, requester_id: i64) -> AppResult<Vec<ItemRequestOut>> {
        if !self.repository.users.exists(requester_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let requests = self.repository.requests.find_by_requester(requester_id).await?;
        self.enrich(requests).await
    }

    /// Other users' requests, newest first
    pub async fn find_all_by_other_users(
        &self,
        caller_id: i64,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<ItemRequestOut>> {
        super::check_page(from, size)?;
        if !self.repository.users.exists(caller_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let requests = self
            .repository
            .requests
            .find_by_other_users(caller_id, from, size)
            .await?;
        self.enrich(requests).await
    }

    /// Fetch one request with its fulfilling items
    pub async fn find_by_id(&self, caller_id: i64, request_id: i64) -> AppResult<ItemRequestOut> {
        if !self.repository.users.exists(caller_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        let request = self.repository.requests.get_by_id(request_id).await?;
        let items = self.repository.items.find_by_request(request_id).await?;
        Ok(ItemRequestOut::new(
            request,
            items.into_iter().map(ItemOut::from).collect(),
        ))
    }

    /// Join each request with the items referencing it
    async fn enrich(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestOut>> {
        let request_ids: Vec<i64> = requests.iter().map(|r| r.id).collect();

        let mut items_by_request: HashMap<i64, Vec<ItemOut>> = HashMap::new();
        for item in self.repository.items.find_by_requests(&request_ids).await? {
            if let Some(request_id) = item.request_id {
                items_by_request
                    .entry(request_id)
                    .or_default()
                    .push(ItemOut::from(item));
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = items_by_request.remove(&request.id).unwrap_or_default();
                ItemRequestOut::new(request, items)
            })
            .collect())
    }
}
