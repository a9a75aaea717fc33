use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use std::convert::Infallible;
use url::form_urlencoded;
use uuid::Uuid;

use crate::database::Page;
use crate::error::ApiError;
use crate::filter::{Listing, ListingQuery};

/// Parse a path or query id; malformed ids are a 400.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("invalid id '{}'", raw)))
}

/// Listing payload: the window, the overall match count, and the normalized paging.
#[derive(Debug, Serialize)]
pub struct ListingResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T: Serialize> ListingResponse<T> {
    pub fn new(page: Page<T>, listing: &Listing) -> Self {
        Self {
            items: page.items,
            total_count: page.total_count,
            page: listing.page,
            limit: listing.limit,
        }
    }
}

fn query_pairs(parts: &Parts) -> form_urlencoded::Parse<'_> {
    form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes())
}

/// Paging never rejects a request, so this extractor cannot fail.
#[async_trait]
impl<S> FromRequestParts<S> for ListingQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ListingQuery::from_pairs(query_pairs(parts)))
    }
}

/// `GET /api/task` query string: the usual listing parameters plus an optional list filter.
#[derive(Debug, Default)]
pub struct TaskListingQuery {
    pub listing: ListingQuery,
    pub task_list_id: Option<String>,
}

impl TaskListingQuery {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut task_list_id = None;
        let mut rest = Vec::new();
        for (key, value) in pairs {
            if key.as_ref() == "task_list_id" {
                task_list_id.get_or_insert_with(|| value.into());
            } else {
                rest.push((key, value));
            }
        }
        Self {
            listing: ListingQuery::from_pairs(rest),
            task_list_id,
        }
    }

    /// Only a malformed `task_list_id` is an error; paging always degrades to defaults.
    pub fn split(self) -> Result<(Option<Uuid>, Listing), ApiError> {
        let task_list_id = self
            .task_list_id
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(parse_id)
            .transpose()?;
        Ok((task_list_id, Listing::from(self.listing)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TaskListingQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(TaskListingQuery::from_pairs(query_pairs(parts)))
    }
}
