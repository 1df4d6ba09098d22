//! GraphQL Collection Client
//!
//! Speaks the list/create/update/delete documents a managed GraphQL backend
//! generates for a model.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{decode, normalize_base_url, read_body, Expected, RemoteCollection};
use crate::error::{SyncError, SyncResult};
use crate::record::Record;

/// Query and mutation documents for one record type
///
/// Each `*_FIELD` names the key under `data` holding the operation result.
pub trait GraphqlDocuments: Record {
    const LIST_QUERY: &'static str;
    const LIST_FIELD: &'static str;
    const CREATE_MUTATION: &'static str;
    const CREATE_FIELD: &'static str;
    const UPDATE_MUTATION: &'static str;
    const UPDATE_FIELD: &'static str;
    const DELETE_MUTATION: &'static str;
    const DELETE_FIELD: &'static str;

    /// `input` for the update mutation: the staged record with its id
    fn update_input(id: &str, record: &Self) -> SyncResult<Value> {
        let mut input = serde_json::to_value(record)?;
        if let Value::Object(map) = &mut input {
            map.insert("id".to_string(), Value::String(id.to_string()));
        }
        Ok(input)
    }
}

/// How requests authenticate against the endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphqlAuth {
    None,
    /// `x-api-key` header
    ApiKey(String),
    /// Identity token sent as-is in `Authorization`
    Token(String),
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

#[derive(Deserialize)]
struct GraphqlErrorItem {
    message: String,
}

/// `listX` results arrive as a connection page
#[derive(Deserialize)]
struct Connection<T> {
    items: Vec<Option<T>>,
}

/// Pull `data.{field}` out of a GraphQL response body
pub fn extract_field<T: DeserializeOwned>(body: &str, field: &str) -> SyncResult<T> {
    let envelope: Envelope = decode(body)?;
    if !envelope.errors.is_empty() {
        let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(SyncError::Graphql(messages.join("; ")));
    }
    let mut data = envelope
        .data
        .ok_or_else(|| SyncError::Decode("response has no data".to_string()))?;
    let value = data
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| SyncError::Decode(format!("response has no '{}' field", field)))?;
    serde_json::from_value(value).map_err(|e| SyncError::Decode(e.to_string()))
}

/// A delete mutation answers with the removed record; `null` means nothing was deleted
fn confirm_deleted(value: Value, field: &str) -> SyncResult<()> {
    if value.is_null() {
        return Err(SyncError::Decode(format!("'{}' returned null", field)));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct GraphqlCollection<R> {
    http: reqwest::Client,
    endpoint: String,
    auth: GraphqlAuth,
    record: PhantomData<fn() -> R>,
}

impl<R: GraphqlDocuments> GraphqlCollection<R> {
    pub fn new(endpoint: &str, auth: GraphqlAuth) -> SyncResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: normalize_base_url(endpoint)?,
            auth,
            record: PhantomData,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, document: &str, variables: Value, field: &str) -> SyncResult<T> {
        debug!(resource = R::RESOURCE, operation = field, "POST {}", self.endpoint);
        let request = self.http.post(&self.endpoint).json(&GraphqlRequest { query: document, variables });
        let request = match &self.auth {
            GraphqlAuth::None => request,
            GraphqlAuth::ApiKey(key) => request.header("x-api-key", key),
            GraphqlAuth::Token(token) => request.header("Authorization", token),
        };
        let response = request.send().await?;
        let body = read_body(response, Expected::Success).await?;
        extract_field(&body, field)
    }
}

#[async_trait(?Send)]
impl<R: GraphqlDocuments> RemoteCollection for GraphqlCollection<R> {
    type Record = R;

    async fn list(&self) -> SyncResult<Vec<R>> {
        let page: Connection<R> = self.execute(R::LIST_QUERY, json!({}), R::LIST_FIELD).await?;
        Ok(page.items.into_iter().flatten().collect())
    }

    async fn create(&self, draft: &R::Draft) -> SyncResult<R> {
        let variables = json!({ "input": draft });
        self.execute(R::CREATE_MUTATION, variables, R::CREATE_FIELD).await
    }

    async fn update(&self, id: &str, record: &R) -> SyncResult<R> {
        let variables = json!({ "input": R::update_input(id, record)? });
        self.execute(R::UPDATE_MUTATION, variables, R::UPDATE_FIELD).await
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        let variables = json!({ "input": { "id": id } });
        let deleted: Value = self.execute(R::DELETE_MUTATION, variables, R::DELETE_FIELD).await?;
        confirm_deleted(deleted, R::DELETE_FIELD)
    }
}
