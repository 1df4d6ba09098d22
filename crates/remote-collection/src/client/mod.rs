//! Remote Collection Clients
//!
//! One round trip per call: no retries, batching or caching.

mod graphql;
mod rest;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{SyncError, SyncResult};
use crate::record::Record;

pub use graphql::{extract_field, GraphqlAuth, GraphqlCollection, GraphqlDocuments};
pub use rest::RestCollection;

/// Core client trait for collection CRUD
///
/// Futures are not `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait RemoteCollection {
    type Record: Record;

    /// Fetch the whole collection
    async fn list(&self) -> SyncResult<Vec<Self::Record>>;

    /// Create a record; the returned record carries the server id
    async fn create(&self, draft: &<Self::Record as Record>::Draft) -> SyncResult<Self::Record>;

    /// Replace a record with the staged copy
    async fn update(&self, id: &str, record: &Self::Record) -> SyncResult<Self::Record>;

    /// Delete a record by id
    async fn delete(&self, id: &str) -> SyncResult<()>;
}

/// Status a call accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expected {
    /// Any 2xx
    Success,
    Exactly(u16),
}

impl Expected {
    pub(crate) fn accepts(self, status: u16) -> bool {
        match self {
            Expected::Success => (200..300).contains(&status),
            Expected::Exactly(code) => status == code,
        }
    }
}

/// Read the body, turning unexpected statuses into `SyncError::Rejected`
pub(crate) async fn read_body(response: reqwest::Response, expected: Expected) -> SyncResult<String> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    if expected.accepts(status) {
        Ok(body)
    } else {
        Err(SyncError::rejected(status, &body))
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> SyncResult<T> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}

/// Accept absolute http(s) URLs only; strips trailing slashes
pub(crate) fn normalize_base_url(raw: &str) -> SyncResult<String> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| SyncError::Config(format!("invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim().trim_end_matches('/').to_string()),
        other => Err(SyncError::Config(format!("unsupported URL scheme '{}' in '{}'", other, raw))),
    }
}
