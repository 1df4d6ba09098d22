//! Collection State
//!
//! Pure reducer behind every collection view. Mutations are applied
//! optimistically, each one tagged with a ticket; the matching `apply_*`
//! either confirms it with the server's record or reverts it.
//!
//! Tickets carry the generation of the view instance that issued them.
//! `cancel()` moves to a new generation, so late responses are ignored.
//!
//! Rollback never restores a snapshot. The state keeps the last record the
//! server confirmed for each id; what a row shows is the newest staged update
//! still in flight for it, or that confirmed record when there is none.

use std::collections::{HashMap, HashSet};

use crate::error::{SyncError, SyncResult};
use crate::record::{Fields, Record};

/// Client-generated correlation token for one in-flight operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u64);

/// Handle returned by every `begin_*`/`submit_*` transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    token: Token,
}

impl Ticket {
    pub fn token(&self) -> Token {
        self.token
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// What a response did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Server truth applied
    Confirmed,
    /// Failure; the optimistic change was reverted
    RolledBack,
    /// Ticket from a cancelled or superseded operation; nothing changed
    Stale,
    /// Nothing to submit
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry<R> {
    pub record: R,
    /// Set while the create that produced this entry is unconfirmed
    pub pending: Option<Token>,
}

impl<R> Entry<R> {
    fn confirmed(record: R) -> Self {
        Self { record, pending: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(String),
    Pending(Token),
    /// Server record without an id
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub label: &'static str,
    pub value: String,
}

/// Render model of one entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub key: RowKey,
    pub id: Option<String>,
    pub cells: Vec<Cell>,
    pub pending: bool,
}

/// A failure surfaced to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Increases with every failure, so timers can dismiss only their own notice
    pub serial: u64,
    /// `load`, `create`, `update` or `delete`
    pub action: &'static str,
    pub error: SyncError,
}

#[derive(Debug, Clone)]
enum Undo<R: Record> {
    Load { previous: Phase },
    Insert { draft: R::Draft },
    Update { id: String, staged: R },
    Delete { index: usize, entry: Entry<R> },
}

#[derive(Debug, Clone)]
pub struct CollectionState<R: Record> {
    phase: Phase,
    entries: Vec<Entry<R>>,
    form_visible: bool,
    draft: R::Draft,
    edit_target: Option<R>,
    last_error: Option<Notice>,
    generation: u64,
    next_token: u64,
    next_serial: u64,
    in_flight: HashMap<Token, Undo<R>>,
    /// Last server-confirmed record per id
    confirmed: HashMap<String, R>,
}

impl<R: Record> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            entries: Vec::new(),
            form_visible: false,
            draft: R::Draft::default(),
            edit_target: None,
            last_error: None,
            generation: 0,
            next_token: 0,
            next_serial: 0,
            in_flight: HashMap::new(),
            confirmed: HashMap::new(),
        }
    }
}

impl<R: Record> CollectionState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Queries
    // ========================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entries(&self) -> &[Entry<R>] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Confirmed record with this id
    pub fn find(&self, id: &str) -> Option<&R> {
        self.position_of(id).map(|i| &self.entries[i].record)
    }

    pub fn rows(&self) -> Vec<Row> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let id = entry.record.id().map(str::to_string);
                let key = match (&id, entry.pending) {
                    (_, Some(token)) => RowKey::Pending(token),
                    (Some(id), None) => RowKey::Id(id.clone()),
                    (None, None) => RowKey::Position(index),
                };
                let cells = R::FIELDS
                    .iter()
                    .map(|spec| Cell {
                        label: spec.label,
                        value: entry.record.field(spec.name).unwrap_or_default().to_string(),
                    })
                    .collect();
                Row { key, id, cells, pending: entry.pending.is_some() }
            })
            .collect()
    }

    pub fn form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn edit_target(&self) -> Option<&R> {
        self.edit_target.as_ref()
    }

    pub fn last_error(&self) -> Option<&Notice> {
        self.last_error.as_ref()
    }

    /// Number of operations awaiting a response
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    // ========================
    // Local UI transitions
    // ========================

    pub fn toggle_form(&mut self) {
        self.form_visible = !self.form_visible;
    }

    pub fn set_draft_field(&mut self, name: &str, value: String) -> bool {
        self.draft.set_field(name, value)
    }

    /// Stage a copy of the record for editing; the list is untouched
    pub fn open_edit(&mut self, id: &str) -> bool {
        self.edit_target = self.find(id).cloned();
        self.edit_target.is_some()
    }

    pub fn set_edit_field(&mut self, name: &str, value: String) -> bool {
        match &mut self.edit_target {
            Some(staged) => staged.set_field(name, value),
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn dismiss_error_if(&mut self, serial: u64) {
        if self.last_error.as_ref().map(|n| n.serial) == Some(serial) {
            self.last_error = None;
        }
    }

    // ========================
    // Load
    // ========================

    /// Start a full fetch; supersedes any load already in flight
    pub fn begin_load(&mut self) -> Ticket {
        let previous = self
            .in_flight
            .values()
            .find_map(|undo| match undo {
                Undo::Load { previous } => Some(*previous),
                _ => None,
            })
            .unwrap_or(self.phase);
        self.in_flight.retain(|_, undo| !matches!(undo, Undo::Load { .. }));
        self.phase = Phase::Loading;
        self.issue(Undo::Load { previous })
    }

    pub fn apply_loaded(&mut self, ticket: Ticket, result: SyncResult<Vec<R>>) -> Applied {
        let Some(undo) = self.settle(ticket) else {
            return Applied::Stale;
        };
        match result {
            Ok(records) => {
                let deleting: HashSet<String> = self
                    .in_flight
                    .values()
                    .filter_map(|undo| match undo {
                        Undo::Delete { entry, .. } => entry.record.id().map(str::to_string),
                        _ => None,
                    })
                    .collect();
                let pending: Vec<Entry<R>> = std::mem::take(&mut self.entries)
                    .into_iter()
                    .filter(|e| e.pending.map_or(false, |t| self.in_flight.contains_key(&t)))
                    .collect();
                self.confirmed = records
                    .iter()
                    .filter_map(|r| r.id().map(|id| (id.to_string(), r.clone())))
                    .collect();
                let mut entries = Vec::with_capacity(records.len() + pending.len());
                for record in records {
                    let shown = match record.id() {
                        Some(id) if deleting.contains(id) => continue,
                        // Updates still in flight stay on screen over the reload
                        Some(id) => self.current_view(id),
                        None => None,
                    };
                    entries.push(Entry::confirmed(shown.unwrap_or(record)));
                }
                entries.extend(pending);
                self.entries = entries;
                self.phase = Phase::Ready;
                Applied::Confirmed
            }
            Err(error) => self.fail(ticket.token, undo, "load", error),
        }
    }

    // ========================
    // Create
    // ========================

    /// Validate the draft and insert it optimistically
    ///
    /// On a validation failure nothing changes and no call must be made.
    pub fn submit_create(&mut self) -> SyncResult<(Ticket, R::Draft)> {
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            return Err(SyncError::Validation(missing));
        }
        let draft = std::mem::take(&mut self.draft);
        let ticket = self.issue(Undo::Insert { draft: draft.clone() });
        self.entries.push(Entry { record: R::from_draft(&draft), pending: Some(ticket.token) });
        self.form_visible = false;
        Ok((ticket, draft))
    }

    /// Replace the pending entry, matched by token, with the server record
    pub fn apply_created(&mut self, ticket: Ticket, result: SyncResult<R>) -> Applied {
        let Some(undo) = self.settle(ticket) else {
            return Applied::Stale;
        };
        match result {
            Ok(record) => {
                if let Some(id) = record.id() {
                    self.entries.retain(|e| e.pending.is_some() || e.record.id() != Some(id));
                    self.confirmed.insert(id.to_string(), record.clone());
                }
                match self.entries.iter().position(|e| e.pending == Some(ticket.token)) {
                    Some(index) => self.entries[index] = Entry::confirmed(record),
                    None => self.entries.push(Entry::confirmed(record)),
                }
                Applied::Confirmed
            }
            Err(error) => self.fail(ticket.token, undo, "create", error),
        }
    }

    // ========================
    // Update
    // ========================

    /// Apply the staged edit in place and close the editor
    ///
    /// Returns the id and staged record to send.
    pub fn begin_update(&mut self) -> Option<(Ticket, String, R)> {
        let staged = self.edit_target.take()?;
        let id = staged.id()?.to_string();
        let index = self.position_of(&id)?;
        self.entries[index].record = staged.clone();
        let ticket = self.issue(Undo::Update { id: id.clone(), staged: staged.clone() });
        Some((ticket, id, staged))
    }

    /// The server's response wins unless a newer update for the same id is
    /// still in flight; exactly one entry keeps the id
    pub fn apply_updated(&mut self, ticket: Ticket, result: SyncResult<R>) -> Applied {
        let Some(undo) = self.settle(ticket) else {
            return Applied::Stale;
        };
        match result {
            Ok(record) => {
                let id = match (&undo, record.id()) {
                    (_, Some(id)) => id.to_string(),
                    (Undo::Update { id, .. }, None) => id.clone(),
                    _ => return Applied::Stale,
                };
                self.confirmed.insert(id.clone(), record.clone());
                let shown = self.current_view(&id).unwrap_or(record);
                let mut seen = false;
                self.entries.retain_mut(|entry| {
                    if entry.pending.is_some() || entry.record.id() != Some(id.as_str()) {
                        return true;
                    }
                    if seen {
                        return false;
                    }
                    seen = true;
                    entry.record = shown.clone();
                    true
                });
                Applied::Confirmed
            }
            Err(error) => self.fail(ticket.token, undo, "update", error),
        }
    }

    // ========================
    // Delete
    // ========================

    /// Remove the row now, remembering where it was
    pub fn begin_delete(&mut self, id: &str) -> Option<Ticket> {
        let index = self.position_of(id)?;
        let entry = self.entries.remove(index);
        if self.edit_target.as_ref().and_then(|r| r.id()) == Some(id) {
            self.edit_target = None;
        }
        Some(self.issue(Undo::Delete { index, entry }))
    }

    pub fn apply_deleted(&mut self, ticket: Ticket, result: SyncResult<()>) -> Applied {
        let Some(undo) = self.settle(ticket) else {
            return Applied::Stale;
        };
        match result {
            Ok(()) => {
                if let Undo::Delete { entry, .. } = &undo {
                    if let Some(id) = entry.record.id() {
                        self.entries.retain(|e| e.record.id() != Some(id));
                        self.confirmed.remove(id);
                    }
                }
                Applied::Confirmed
            }
            Err(error) => self.fail(ticket.token, undo, "delete", error),
        }
    }

    // ========================
    // Lifecycle
    // ========================

    /// Drop the current view instance's in-flight work
    ///
    /// Every outstanding optimistic change is reverted (newest first) and
    /// responses to tickets issued before this call become `Stale`.
    pub fn cancel(&mut self) {
        self.generation += 1;
        let mut outstanding: Vec<(Token, Undo<R>)> = self.in_flight.drain().collect();
        outstanding.sort_by(|a, b| b.0.cmp(&a.0));
        for (token, undo) in outstanding {
            self.revert(token, undo);
        }
    }

    // ========================
    // Internals
    // ========================

    fn position_of(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.pending.is_none() && e.record.id() == Some(id))
    }

    /// What a row with this id should show given the work still in flight
    fn current_view(&self, id: &str) -> Option<R> {
        self.in_flight
            .iter()
            .filter_map(|(token, undo)| match undo {
                Undo::Update { id: staged_id, staged } if staged_id == id => Some((*token, staged)),
                _ => None,
            })
            .max_by_key(|(token, _)| *token)
            .map(|(_, staged)| staged.clone())
            .or_else(|| self.confirmed.get(id).cloned())
    }

    fn issue(&mut self, undo: Undo<R>) -> Ticket {
        self.next_token += 1;
        let token = Token(self.next_token);
        self.in_flight.insert(token, undo);
        Ticket { generation: self.generation, token }
    }

    fn settle(&mut self, ticket: Ticket) -> Option<Undo<R>> {
        if ticket.generation != self.generation {
            return None;
        }
        self.in_flight.remove(&ticket.token)
    }

    fn fail(&mut self, token: Token, undo: Undo<R>, action: &'static str, error: SyncError) -> Applied {
        self.revert(token, undo);
        self.next_serial += 1;
        self.last_error = Some(Notice { serial: self.next_serial, action, error });
        Applied::RolledBack
    }

    fn revert(&mut self, token: Token, undo: Undo<R>) {
        match undo {
            Undo::Load { previous } => self.phase = previous,
            Undo::Insert { draft } => {
                self.entries.retain(|e| e.pending != Some(token));
                // Hand the input back unless the user already started a new one
                if self.draft == R::Draft::default() {
                    self.draft = draft;
                    self.form_visible = true;
                }
            }
            Undo::Update { id, .. } => {
                let shown = self.current_view(&id);
                if let (Some(index), Some(record)) = (self.position_of(&id), shown) {
                    self.entries[index].record = record;
                }
            }
            Undo::Delete { index, mut entry } => {
                let restored = entry.record.id().and_then(|id| self.current_view(id));
                if let Some(record) = restored {
                    entry.record = record;
                }
                let index = index.min(self.entries.len());
                self.entries.insert(index, entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    fn user(id: &str, username: &str, email: &str) -> User {
        User { id: id.into(), username: username.into(), email: email.into() }
    }

    fn ready(users: Vec<User>) -> CollectionState<User> {
        let mut state = CollectionState::new();
        let ticket = state.begin_load();
        assert_eq!(state.apply_loaded(ticket, Ok(users)), Applied::Confirmed);
        state
    }

    fn fill_draft(state: &mut CollectionState<User>, username: &str, email: &str) {
        state.set_draft_field("username", username.into());
        state.set_draft_field("email", email.into());
    }

    fn network_down() -> SyncError {
        SyncError::Transport("offline".into())
    }

    #[test]
    fn test_rows_mirror_loaded_records() {
        let users = vec![user("1", "a", "a@x.com"), user("2", "b", "b@x.com")];
        let state = ready(users.clone());

        assert_eq!(state.phase(), Phase::Ready);
        let rows = state.rows();
        assert_eq!(rows.len(), users.len());
        for (row, user) in rows.iter().zip(&users) {
            assert_eq!(row.key, RowKey::Id(user.id.clone()));
            assert_eq!(row.cells[0], Cell { label: "Username", value: user.username.clone() });
            assert_eq!(row.cells[1], Cell { label: "Email", value: user.email.clone() });
            assert!(!row.pending);
        }
    }

    #[test]
    fn test_load_failure_returns_to_previous_phase() {
        let mut state = CollectionState::<User>::new();
        let ticket = state.begin_load();
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.apply_loaded(ticket, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.last_error().unwrap().action, "load");
    }

    #[test]
    fn test_newer_load_supersedes_older() {
        let mut state = CollectionState::<User>::new();
        let first = state.begin_load();
        let second = state.begin_load();
        assert_eq!(state.apply_loaded(first, Ok(vec![user("1", "old", "o@x.com")])), Applied::Stale);
        assert!(state.is_empty());
        assert_eq!(state.apply_loaded(second, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_create_with_empty_field_changes_nothing() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        state.toggle_form();
        fill_draft(&mut state, "b", "");
        let before_entries = state.entries().to_vec();
        let before_draft = state.draft().clone();

        let err = state.submit_create().unwrap_err();
        assert_eq!(err, SyncError::Validation(vec!["email"]));
        assert_eq!(state.entries(), &before_entries[..]);
        assert_eq!(state.draft(), &before_draft);
        assert!(state.form_visible());
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn test_created_id_is_backfilled_by_token() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        fill_draft(&mut state, "b", "b@x.com");
        let (ticket, draft) = state.submit_create().unwrap();
        assert_eq!(draft.username, "b");
        assert_eq!(state.draft(), &Default::default());
        assert!(state.rows()[1].pending);

        let server = user("7", "b", "b@x.com");
        assert_eq!(state.apply_created(ticket, Ok(server.clone())), Applied::Confirmed);
        assert_eq!(state.find("7"), Some(&server));
        assert_eq!(state.len(), 2);
        assert!(state.entries().iter().all(|e| e.pending.is_none()));
    }

    #[test]
    fn test_two_creates_reconcile_independently() {
        let mut state = ready(vec![]);
        fill_draft(&mut state, "a", "a@x.com");
        let (first, _) = state.submit_create().unwrap();
        fill_draft(&mut state, "b", "b@x.com");
        let (second, _) = state.submit_create().unwrap();

        state.apply_created(second, Ok(user("2", "b", "b@x.com")));
        state.apply_created(first, Ok(user("1", "a", "a@x.com")));

        let ids: Vec<_> = state.records().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_failed_create_rolls_back_and_restores_draft() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let before = state.entries().to_vec();
        fill_draft(&mut state, "b", "b@x.com");
        let (ticket, _) = state.submit_create().unwrap();

        assert_eq!(state.apply_created(ticket, Err(SyncError::rejected(500, "boom"))), Applied::RolledBack);
        assert_eq!(state.entries(), &before[..]);
        assert_eq!(state.draft().username, "b");
        assert!(state.form_visible());
        assert_eq!(state.last_error().unwrap().action, "create");
    }

    #[test]
    fn test_update_scenario_server_response_wins() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        assert!(state.open_edit("1"));
        state.set_edit_field("username", "b".into());
        // Staged copy only; the list still shows the original
        assert_eq!(state.find("1").unwrap().username, "a");

        let (ticket, id, staged) = state.begin_update().unwrap();
        assert_eq!(id, "1");
        assert_eq!(staged.username, "b");
        assert!(state.edit_target().is_none());

        let response = user("1", "b", "a@x.com");
        assert_eq!(state.apply_updated(ticket, Ok(response.clone())), Applied::Confirmed);
        assert_eq!(state.records().cloned().collect::<Vec<_>>(), vec![response]);
    }

    #[test]
    fn test_update_keeps_exactly_one_entry_per_id() {
        let mut state = ready(vec![user("1", "a", "a@x.com"), user("2", "c", "c@x.com")]);
        state.open_edit("2");
        state.set_edit_field("email", "new@x.com".into());
        let (ticket, _, _) = state.begin_update().unwrap();

        // Server normalises the email differently than the staged edit
        let response = user("2", "c", "NEW@x.com");
        state.apply_updated(ticket, Ok(response.clone()));
        let matching: Vec<_> = state.records().filter(|u| u.id == "2").collect();
        assert_eq!(matching, vec![&response]);
    }

    #[test]
    fn test_failed_update_reverts_edit() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let before = state.entries().to_vec();
        state.open_edit("1");
        state.set_edit_field("username", "b".into());
        let (ticket, _, _) = state.begin_update().unwrap();
        assert_eq!(state.find("1").unwrap().username, "b");

        assert_eq!(state.apply_updated(ticket, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.entries(), &before[..]);
    }

    fn stage_username(state: &mut CollectionState<User>, id: &str, username: &str) -> Ticket {
        assert!(state.open_edit(id));
        state.set_edit_field("username", username.into());
        let (ticket, _, _) = state.begin_update().unwrap();
        ticket
    }

    #[test]
    fn test_overlapping_updates_that_fail_restore_server_value() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let first = stage_username(&mut state, "1", "b");
        let second = stage_username(&mut state, "1", "c");
        assert_eq!(state.find("1").unwrap().username, "c");

        // The newer staging stays visible while it is still in flight
        assert_eq!(state.apply_updated(first, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.find("1").unwrap().username, "c");
        assert_eq!(state.apply_updated(second, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.find("1").unwrap().username, "a");
    }

    #[test]
    fn test_overlapping_updates_failing_newest_first() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let first = stage_username(&mut state, "1", "b");
        let second = stage_username(&mut state, "1", "c");

        state.apply_updated(second, Err(network_down()));
        assert_eq!(state.find("1").unwrap().username, "b");
        state.apply_updated(first, Err(network_down()));
        assert_eq!(state.find("1").unwrap().username, "a");
    }

    #[test]
    fn test_confirmed_update_becomes_base_for_later_failure() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let first = stage_username(&mut state, "1", "b");
        let second = stage_username(&mut state, "1", "c");

        assert_eq!(state.apply_updated(first, Ok(user("1", "b", "a@x.com"))), Applied::Confirmed);
        assert_eq!(state.find("1").unwrap().username, "c");
        state.apply_updated(second, Err(network_down()));
        assert_eq!(state.find("1").unwrap().username, "b");
    }

    #[test]
    fn test_update_then_delete_both_fail_restores_server_value() {
        let mut state = ready(vec![user("1", "a", "a@x.com"), user("2", "z", "z@x.com")]);
        let before = state.entries().to_vec();
        let update = stage_username(&mut state, "1", "b");
        let delete = state.begin_delete("1").unwrap();

        state.apply_updated(update, Err(network_down()));
        assert!(state.find("1").is_none());
        state.apply_deleted(delete, Err(network_down()));
        assert_eq!(state.entries(), &before[..]);
    }

    #[test]
    fn test_delete_failing_before_update_shows_staged_copy() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let update = stage_username(&mut state, "1", "b");
        let delete = state.begin_delete("1").unwrap();

        state.apply_deleted(delete, Err(network_down()));
        assert_eq!(state.find("1").unwrap().username, "b");
        state.apply_updated(update, Err(network_down()));
        assert_eq!(state.find("1").unwrap().username, "a");
    }

    #[test]
    fn test_reload_then_failed_update_restores_reloaded_record() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let update = stage_username(&mut state, "1", "b");

        let reload = state.begin_load();
        state.apply_loaded(reload, Ok(vec![user("1", "a2", "a2@x.com")]));
        // Staged edit survives the reload while its request is pending
        assert_eq!(state.find("1").unwrap().username, "b");

        assert_eq!(state.apply_updated(update, Err(network_down())), Applied::RolledBack);
        assert_eq!(state.find("1"), Some(&user("1", "a2", "a2@x.com")));
    }

    #[test]
    fn test_update_without_edit_target_is_skipped() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        assert!(state.begin_update().is_none());
        assert!(!state.open_edit("missing"));
    }

    #[test]
    fn test_delete_confirmed_removes_id() {
        let mut state = ready(vec![user("1", "a", "a@x.com"), user("2", "b", "b@x.com")]);
        let ticket = state.begin_delete("1").unwrap();
        assert!(state.find("1").is_none());
        assert_eq!(state.apply_deleted(ticket, Ok(())), Applied::Confirmed);
        assert_eq!(state.records().filter(|u| u.id == "1").count(), 0);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_failed_delete_restores_row_in_place() {
        let users = vec![user("1", "a", "a@x.com"), user("2", "b", "b@x.com"), user("3", "c", "c@x.com")];
        let mut state = ready(users);
        let before = state.entries().to_vec();
        let ticket = state.begin_delete("2").unwrap();

        assert_eq!(state.apply_deleted(ticket, Err(SyncError::rejected(403, ""))), Applied::RolledBack);
        assert_eq!(state.entries(), &before[..]);
    }

    #[test]
    fn test_cancel_makes_tickets_stale_and_reverts() {
        let mut state = ready(vec![user("1", "a", "a@x.com")]);
        let before = state.entries().to_vec();
        let delete = state.begin_delete("1").unwrap();
        fill_draft(&mut state, "b", "b@x.com");
        let (create, _) = state.submit_create().unwrap();

        state.cancel();
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.entries(), &before[..]);
        assert_eq!(state.apply_deleted(delete, Ok(())), Applied::Stale);
        assert_eq!(state.apply_created(create, Ok(user("9", "b", "b@x.com"))), Applied::Stale);
        assert_eq!(state.entries(), &before[..]);
    }

    #[test]
    fn test_reload_keeps_inflight_work() {
        let mut state = ready(vec![user("1", "a", "a@x.com"), user("2", "b", "b@x.com")]);
        let delete = state.begin_delete("1").unwrap();
        fill_draft(&mut state, "c", "c@x.com");
        let (create, _) = state.submit_create().unwrap();

        let reload = state.begin_load();
        state.apply_loaded(reload, Ok(vec![user("1", "a", "a@x.com"), user("2", "b", "b@x.com")]));
        let keys: Vec<_> = state.rows().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![RowKey::Id("2".into()), RowKey::Pending(create.token())]);

        assert_eq!(state.apply_deleted(delete, Ok(())), Applied::Confirmed);
        assert_eq!(state.apply_created(create, Ok(user("3", "c", "c@x.com"))), Applied::Confirmed);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_dismiss_only_matching_notice() {
        let mut state = CollectionState::<User>::new();
        let ticket = state.begin_load();
        state.apply_loaded(ticket, Err(network_down()));
        let serial = state.last_error().unwrap().serial;

        state.dismiss_error_if(serial + 1);
        assert!(state.last_error().is_some());
        state.dismiss_error_if(serial);
        assert!(state.last_error().is_none());
    }
}
