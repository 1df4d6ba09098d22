//! Shell State Store
//!
//! Uses Leptos reactive_stores for the state every page shares: the loaded
//! configuration and the signed-in principal. Collection data is owned by
//! each collection view, not by this store.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::config::AppConfig;
use crate::session::Session;

#[derive(Clone, Debug, Store)]
pub struct ShellState {
    pub config: AppConfig,
    /// `None` until the identity provider has signed someone in
    pub session: Option<Session>,
}

impl ShellState {
    pub fn new(config: AppConfig) -> Self {
        let session = Session::load(&config.auth);
        Self { config, session }
    }
}

/// Type alias for the store
pub type ShellStore = Store<ShellState>;

/// Get the shell store from context
pub fn use_shell_store() -> ShellStore {
    expect_context::<ShellStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Token the API clients forward, if the session carries one
pub fn store_bearer_token(store: &ShellStore) -> Option<String> {
    store.session().read().as_ref().and_then(|s| s.id_token.clone())
}

pub fn store_username(store: &ShellStore) -> String {
    store.session().read().as_ref().map(|s| s.username.clone()).unwrap_or_default()
}

pub fn store_sign_out(store: &ShellStore) {
    let auth = store.config().read().auth.clone();
    store.session().set(None);
    Session::sign_out(&auth);
}
