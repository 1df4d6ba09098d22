//! REST Collection Client
//!
//! `GET|POST /{resource}`, `PUT|DELETE /{resource}/{id}`.

use std::marker::PhantomData;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use super::{decode, normalize_base_url, read_body, Expected, RemoteCollection};
use crate::error::SyncResult;
use crate::record::Record;

/// Characters escaped in an id path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone)]
pub struct RestCollection<R> {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    record: PhantomData<fn() -> R>,
}

impl<R: Record> RestCollection<R> {
    pub fn new(base_url: &str) -> SyncResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: normalize_base_url(base_url)?,
            token: None,
            record: PhantomData,
        })
    }

    /// Send `Authorization: Bearer <token>` on every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, R::RESOURCE)
    }

    pub fn record_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), utf8_percent_encode(id, PATH_SEGMENT))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait(?Send)]
impl<R: Record> RemoteCollection for RestCollection<R> {
    type Record = R;

    async fn list(&self) -> SyncResult<Vec<R>> {
        let url = self.collection_url();
        debug!(resource = R::RESOURCE, "GET {}", url);
        let response = self.authorize(self.http.get(&url)).send().await?;
        let body = read_body(response, Expected::Success).await?;
        decode(&body)
    }

    async fn create(&self, draft: &R::Draft) -> SyncResult<R> {
        let url = self.collection_url();
        debug!(resource = R::RESOURCE, "POST {}", url);
        let response = self.authorize(self.http.post(&url)).json(draft).send().await?;
        let body = read_body(response, Expected::Exactly(201)).await?;
        decode(&body)
    }

    async fn update(&self, id: &str, record: &R) -> SyncResult<R> {
        let url = self.record_url(id);
        debug!(resource = R::RESOURCE, "PUT {}", url);
        let response = self.authorize(self.http.put(&url)).json(record).send().await?;
        let body = read_body(response, Expected::Exactly(200)).await?;
        decode(&body)
    }

    async fn delete(&self, id: &str) -> SyncResult<()> {
        let url = self.record_url(id);
        debug!(resource = R::RESOURCE, "DELETE {}", url);
        let response = self.authorize(self.http.delete(&url)).send().await?;
        read_body(response, Expected::Exactly(204)).await?;
        Ok(())
    }
}
