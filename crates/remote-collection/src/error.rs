//! Sync Errors
//!
//! Everything that can go wrong between a collection view and its server.

/// Common result type for collection operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Longest server body excerpt kept in a rejection
const BODY_EXCERPT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The request never completed (network unreachable, CORS, aborted)
    Transport(String),
    /// The server answered with a status the operation does not accept
    Rejected { status: u16, body: String },
    /// The GraphQL envelope carried an `errors` array
    Graphql(String),
    /// The response body did not match the expected shape
    Decode(String),
    /// Required fields left empty; checked locally, never sent
    Validation(Vec<&'static str>),
    /// Client misconfiguration (bad base URL, missing endpoint)
    Config(String),
}

impl SyncError {
    pub(crate) fn rejected(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(BODY_EXCERPT) {
            Some((cut, _)) => format!("{}…", &body[..cut]),
            None => body.to_string(),
        };
        SyncError::Rejected { status, body }
    }

    /// Short machine-friendly label, used in log fields and CSS classes
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::Transport(_) => "transport",
            SyncError::Rejected { .. } => "rejected",
            SyncError::Graphql(_) => "graphql",
            SyncError::Decode(_) => "decode",
            SyncError::Validation(_) => "validation",
            SyncError::Config(_) => "config",
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Transport(msg) => write!(f, "Network error: {}", msg),
            SyncError::Rejected { status, body } if body.is_empty() => {
                write!(f, "Server rejected the request (HTTP {})", status)
            }
            SyncError::Rejected { status, body } => {
                write!(f, "Server rejected the request (HTTP {}): {}", status, body)
            }
            SyncError::Graphql(msg) => write!(f, "GraphQL error: {}", msg),
            SyncError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            SyncError::Validation(fields) => write!(f, "Required: {}", fields.join(", ")),
            SyncError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}
