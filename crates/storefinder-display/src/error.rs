use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The routing service answered but found no usable route.
    #[error("no route found: {0}")]
    NoRoute(String),

    #[error("failed to serialize map scene: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid routing base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
