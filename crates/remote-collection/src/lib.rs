//! Remote Collection
//!
//! Layered the same way for every collection:
//! - record: field metadata and the `Record` contract
//! - models: Todo, User and Product records with their drafts
//! - client: the `RemoteCollection` trait plus REST and GraphQL implementations
//! - store: the pure collection reducer (optimistic mutations, reconciliation, rollback)
//! - sync: async drivers tying a client to a state cell

mod error;
mod record;
mod models;
pub mod client;
pub mod store;
pub mod sync;

pub use error::{SyncError, SyncResult};
pub use record::{FieldSpec, Fields, Record};
pub use models::{Product, ProductDraft, Todo, TodoDraft, User, UserDraft};
pub use client::{GraphqlAuth, GraphqlCollection, GraphqlDocuments, RemoteCollection, RestCollection};
pub use store::{Applied, Cell, CollectionState, Entry, Notice, Phase, Row, RowKey, Ticket, Token};
pub use sync::StateCell;
