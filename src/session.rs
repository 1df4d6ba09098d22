//! Identity Session
//!
//! The external identity provider signs the user in and leaves a JSON
//! session in `localStorage`; this module only reads and clears it.

use leptos::prelude::window;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// The authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    /// Identity token forwarded to the APIs
    #[serde(default)]
    pub id_token: Option<String>,
}

impl Session {
    /// `None` for malformed sessions or blank usernames
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<Session>(raw)
            .ok()
            .filter(|s| !s.username.trim().is_empty())
    }

    pub fn load(auth: &AuthConfig) -> Option<Self> {
        let storage = window().local_storage().ok().flatten()?;
        let raw = storage.get_item(&auth.session_key).ok().flatten()?;
        let session = Self::parse(&raw);
        match &session {
            Some(s) => tracing::info!(username = %s.username, "session found"),
            None => tracing::warn!(key = %auth.session_key, "stored session is malformed"),
        }
        session
    }

    /// Forget the session and hand control back to the identity provider
    pub fn sign_out(auth: &AuthConfig) {
        if let Ok(Some(storage)) = window().local_storage() {
            if let Err(e) = storage.remove_item(&auth.session_key) {
                tracing::error!("failed to clear session: {:?}", e);
            }
        }
        if let Err(e) = window().location().set_href(&auth.sign_out_url) {
            tracing::error!("failed to navigate to sign-out page: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session() {
        let session = Session::parse(r#"{"username":"alice","id_token":"jwt"}"#).unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.id_token.as_deref(), Some("jwt"));

        let session = Session::parse(r#"{"username":"bob"}"#).unwrap();
        assert!(session.id_token.is_none());
    }

    #[test]
    fn test_reject_unusable_sessions() {
        assert!(Session::parse("").is_none());
        assert!(Session::parse(r#"{"username":"   "}"#).is_none());
        assert!(Session::parse(r#"{"id_token":"jwt"}"#).is_none());
    }
}
