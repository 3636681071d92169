//! Memory proxy
//!
//! Pass-through for the agent's keyed memory store. Successful bodies are
//! returned untouched; failures keep the backend status and carry the
//! backend's text in an `error` field.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::logging::Logger;
use crate::providers::{MemoryBackend, ProviderError, ProviderResult};

/// Error text used when the backend fails with an empty body
pub const BACKEND_FALLBACK_ERROR: &str = "Backend error";

/// Status and JSON body to hand back to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

impl ProxyResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field, when this is a failure response
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// 400 response for keys that cannot name a single entry
///
/// `.` and `..` would be folded away as path segments and address the
/// collection instead of one key.
fn reject_key(key: &str) -> Option<ProxyResponse> {
    match key {
        "" => Some(ProxyResponse::error(400, "Key is required")),
        "." | ".." => Some(ProxyResponse::error(400, format!("Invalid key: {}", key))),
        _ => None,
    }
}

/// Proxy in front of a [`MemoryBackend`]
pub struct MemoryProxy {
    backend: Arc<dyn MemoryBackend>,
    logger: Arc<dyn Logger>,
}

impl MemoryProxy {
    pub fn new(backend: Arc<dyn MemoryBackend>, logger: Arc<dyn Logger>) -> Self {
        Self { backend, logger }
    }

    /// `GET /memory/{key}`
    pub async fn get(&self, key: &str) -> ProxyResponse {
        if let Some(rejected) = reject_key(key) {
            return rejected;
        }
        let result = self.backend.get_memory(key).await;
        self.forward(&format!("/memory/{}", key), result)
    }

    /// `DELETE /memory/{key}`
    pub async fn delete(&self, key: &str) -> ProxyResponse {
        if let Some(rejected) = reject_key(key) {
            return rejected;
        }
        let result = self.backend.delete_memory(key).await;
        self.forward(&format!("/memory/{}", key), result)
    }

    /// `GET /memory`
    pub async fn list(&self) -> ProxyResponse {
        let result = self.backend.list_memory().await;
        self.forward("/memory", result)
    }

    fn forward(&self, route: &str, result: ProviderResult<Value>) -> ProxyResponse {
        match result {
            Ok(body) => ProxyResponse::ok(body),
            Err(ProviderError::Api { status, message }) => {
                let text = message.unwrap_or_else(|| BACKEND_FALLBACK_ERROR.to_string());
                crate::log_error!(self.logger, "[MemoryProxy {}] Backend error: {} {}", route, status, text);
                ProxyResponse::error(status, text)
            }
            Err(e) => {
                crate::log_error!(self.logger, "[MemoryProxy {}] Error: {}", route, e);
                ProxyResponse::error(500, e.user_message("Unknown error"))
            }
        }
    }
}
