//! Response bodies shared by the content handlers.

use serde::Serialize;

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "message": ..., "content": T }`, returned by create.
#[derive(Debug, Serialize)]
pub struct ContentResponse<T: Serialize> {
    pub message: String,
    pub content: T,
}

/// `{ "message": ..., "purged": n }`, returned by empty-trash.
#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub message: String,
    pub purged: u64,
}
