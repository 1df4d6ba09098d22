//! Sync Drivers
//!
//! Each driver runs one transition: begin on the state, one round trip on the
//! client, apply the result. The state is reached through a `StateCell` so the
//! same code runs against a reactive signal in the browser and a `RefCell`
//! in tests.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::client::RemoteCollection;
use crate::error::SyncResult;
use crate::record::Record;
use crate::store::{Applied, CollectionState};

/// Somewhere a `CollectionState` lives
pub trait StateCell<R: Record> {
    /// Run `f` against the state; `None` once the owner is gone
    fn with_state<T>(&self, f: impl FnOnce(&mut CollectionState<R>) -> T) -> Option<T>;
}

impl<R: Record> StateCell<R> for Rc<RefCell<CollectionState<R>>> {
    fn with_state<T>(&self, f: impl FnOnce(&mut CollectionState<R>) -> T) -> Option<T> {
        Some(f(&mut self.borrow_mut()))
    }
}

type RecordOf<C> = <C as RemoteCollection>::Record;

fn resource<C: RemoteCollection>() -> &'static str {
    <RecordOf<C> as Record>::RESOURCE
}

fn log_outcome<C: RemoteCollection>(action: &'static str, applied: Applied) -> Applied {
    match applied {
        Applied::Stale => debug!(resource = resource::<C>(), action, "dropped response for cancelled operation"),
        Applied::RolledBack => warn!(resource = resource::<C>(), action, "optimistic change rolled back"),
        Applied::Confirmed | Applied::Skipped => {}
    }
    applied
}

/// Fetch the whole collection
pub async fn load<C, S>(client: &C, state: &S) -> Applied
where
    C: RemoteCollection,
    S: StateCell<RecordOf<C>>,
{
    let Some(ticket) = state.with_state(|s| s.begin_load()) else {
        return Applied::Stale;
    };
    let result = client.list().await;
    match &result {
        Ok(records) => info!(resource = resource::<C>(), count = records.len(), "collection loaded"),
        Err(e) => warn!(resource = resource::<C>(), kind = e.kind(), "load failed: {}", e),
    }
    let applied = state.with_state(|s| s.apply_loaded(ticket, result)).unwrap_or(Applied::Stale);
    log_outcome::<C>("load", applied)
}

/// Submit the draft; `Err` only when validation stopped it before any call
pub async fn create<C, S>(client: &C, state: &S) -> SyncResult<Applied>
where
    C: RemoteCollection,
    S: StateCell<RecordOf<C>>,
{
    let Some(submitted) = state.with_state(|s| s.submit_create()) else {
        return Ok(Applied::Stale);
    };
    let (ticket, draft) = submitted?;
    let result = client.create(&draft).await;
    match &result {
        Ok(record) => info!(resource = resource::<C>(), id = record.id().unwrap_or("-"), "record created"),
        Err(e) => warn!(resource = resource::<C>(), kind = e.kind(), "create failed: {}", e),
    }
    let applied = state.with_state(|s| s.apply_created(ticket, result)).unwrap_or(Applied::Stale);
    Ok(log_outcome::<C>("create", applied))
}

/// Send the staged edit
pub async fn update<C, S>(client: &C, state: &S) -> Applied
where
    C: RemoteCollection,
    S: StateCell<RecordOf<C>>,
{
    let Some((ticket, id, staged)) = state.with_state(|s| s.begin_update()).flatten() else {
        return Applied::Skipped;
    };
    let result = client.update(&id, &staged).await;
    match &result {
        Ok(_) => info!(resource = resource::<C>(), id = %id, "record updated"),
        Err(e) => warn!(resource = resource::<C>(), id = %id, kind = e.kind(), "update failed: {}", e),
    }
    let applied = state.with_state(|s| s.apply_updated(ticket, result)).unwrap_or(Applied::Stale);
    log_outcome::<C>("update", applied)
}

/// Delete one record by id
pub async fn delete<C, S>(client: &C, state: &S, id: &str) -> Applied
where
    C: RemoteCollection,
    S: StateCell<RecordOf<C>>,
{
    let Some(ticket) = state.with_state(|s| s.begin_delete(id)).flatten() else {
        return Applied::Skipped;
    };
    let result = client.delete(id).await;
    match &result {
        Ok(()) => info!(resource = resource::<C>(), id, "record deleted"),
        Err(e) => warn!(resource = resource::<C>(), id, kind = e.kind(), "delete failed: {}", e),
    }
    let applied = state.with_state(|s| s.apply_deleted(ticket, result)).unwrap_or(Applied::Stale);
    log_outcome::<C>("delete", applied)
}
