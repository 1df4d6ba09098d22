//! Application Configuration
//!
//! Layers, lowest precedence first: built-in defaults, the embedded
//! `app-config.json`, then an optional `window.__APP_CONFIG__` object
//! injected by the hosting page.

use console_logger::LevelFilter;
use remote_collection::{GraphqlAuth, GraphqlCollection, Record, RestCollection, SyncResult, Todo, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const EMBEDDED: &str = include_str!("../app-config.json");
const WINDOW_KEY: &str = "__APP_CONFIG__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL for `/users` and `/products`
    pub rest_base_url: String,
    pub graphql: GraphqlConfig,
    pub auth: AuthConfig,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub log_level: String,
    /// Failure banners hide themselves after this long; 0 keeps them
    pub notice_timeout_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphqlConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

/// Where the external identity provider keeps its session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_key: String,
    pub sign_in_url: String,
    pub sign_out_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rest_base_url: "http://localhost:3000".to_string(),
            graphql: GraphqlConfig::default(),
            auth: AuthConfig::default(),
            log_level: "info".to_string(),
            notice_timeout_ms: 6000,
        }
    }
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:20002/graphql".to_string(),
            api_key: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_key: "crud-sync.session".to_string(),
            sign_in_url: "/login".to_string(),
            sign_out_url: "/".to_string(),
        }
    }
}

impl AppConfig {
    /// Load and validate the configuration for this page
    pub fn load() -> Result<Self, String> {
        Self::from_layers(EMBEDDED, window_override())
    }

    pub fn from_layers(embedded: &str, overrides: Option<Value>) -> Result<Self, String> {
        let mut merged = serde_json::to_value(AppConfig::default()).map_err(|e| e.to_string())?;
        let embedded: Value =
            serde_json::from_str(embedded).map_err(|e| format!("app-config.json: {}", e))?;
        merge(&mut merged, embedded);
        if let Some(overrides) = overrides {
            merge(&mut merged, overrides);
        }
        let config: AppConfig =
            serde_json::from_value(merged).map_err(|e| format!("invalid configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// An API key wins over the session token
    pub fn graphql_auth(&self, token: Option<String>) -> GraphqlAuth {
        let api_key = self.graphql.api_key.clone().filter(|k| !k.is_empty());
        match (api_key, token) {
            (Some(key), _) => GraphqlAuth::ApiKey(key),
            (None, Some(token)) => GraphqlAuth::Token(token),
            (None, None) => GraphqlAuth::None,
        }
    }

    /// Client for the GraphQL todo API
    pub fn todos_client(&self, token: Option<String>) -> SyncResult<GraphqlCollection<Todo>> {
        GraphqlCollection::new(&self.graphql.endpoint, self.graphql_auth(token))
    }

    pub fn rest_client<R: Record>(&self, token: Option<String>) -> SyncResult<RestCollection<R>> {
        Ok(RestCollection::new(&self.rest_base_url)?.with_token(token))
    }

    fn validate(&self) -> Result<(), String> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| format!("unknown log level '{}'", self.log_level))?;
        self.rest_client::<User>(None).map_err(|e| format!("rest_base_url: {}", e))?;
        self.todos_client(None).map_err(|e| format!("graphql.endpoint: {}", e))?;
        Ok(())
    }
}

/// Deep-merge `overlay` into `base`; objects merge key by key, anything else replaces
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn window_override() -> Option<Value> {
    let window = leptos::prelude::window();
    let raw = js_sys::Reflect::get(window.as_ref(), &wasm_bindgen::JsValue::from_str(WINDOW_KEY)).ok()?;
    if raw.is_undefined() || raw.is_null() {
        return None;
    }
    match serde_wasm_bindgen::from_value(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring window.{}: {}", WINDOW_KEY, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_config_is_valid() {
        let config = AppConfig::from_layers(EMBEDDED, None).unwrap();
        assert!(config.rest_base_url.starts_with("http"));
        assert!(config.notice_timeout_ms > 0);
    }

    #[test]
    fn test_overrides_merge_nested_keys() {
        let embedded = r#"{ "graphql": { "endpoint": "https://api.test/graphql", "api_key": "k1" } }"#;
        let overrides = json!({ "graphql": { "api_key": "k2" }, "log_level": "debug" });
        let config = AppConfig::from_layers(embedded, Some(overrides)).unwrap();

        assert_eq!(config.graphql.endpoint, "https://api.test/graphql");
        assert_eq!(config.graphql.api_key.as_deref(), Some("k2"));
        assert_eq!(config.log_level(), LevelFilter::DEBUG);
        // Untouched keys keep their defaults
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_layers(r#"{ "rest_base_url": "api" }"#, None).unwrap_err();
        assert!(err.starts_with("rest_base_url"), "{}", err);

        let err = AppConfig::from_layers(r#"{ "log_level": "loud" }"#, None).unwrap_err();
        assert!(err.contains("loud"));

        assert!(AppConfig::from_layers("not json", None).is_err());
    }

    #[test]
    fn test_api_key_wins_over_token() {
        let mut config = AppConfig::default();
        assert_eq!(config.graphql_auth(None), GraphqlAuth::None);
        config.graphql.api_key = Some(String::new());
        assert_eq!(config.graphql_auth(Some("jwt".into())), GraphqlAuth::Token("jwt".into()));
        config.graphql.api_key = Some("key".into());
        assert_eq!(config.graphql_auth(Some("jwt".into())), GraphqlAuth::ApiKey("key".into()));
    }
}
