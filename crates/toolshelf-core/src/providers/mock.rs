//! Mock backend for testing
//!
//! Scripts raw replies (status + body, or a transport failure) per endpoint.
//! Replies go through the same interpretation as `HttpBackend`, so tests
//! exercise the real success/failure rules without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::channel::oneshot;
use parking_lot::Mutex;
use serde_json::Value;

use super::error::{ProviderError, ProviderResult};
use super::response::{catalog_reply, passthrough_reply, settings_reply, CatalogResponse};
use super::traits::{CatalogProvider, MemoryBackend, SettingsProvider};
use crate::types::ToolIndexEntry;

/// A scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Backend answered with a status and body
    Body { status: u16, body: String },
    /// The request never got an answer
    TransportError(String),
}

impl MockReply {
    /// A reply with a JSON body
    pub fn json(status: u16, body: Value) -> Self {
        Self::Body {
            status,
            body: body.to_string(),
        }
    }

    /// A reply with a raw text body
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::Body {
            status,
            body: body.into(),
        }
    }

    /// A transport failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError(message.into())
    }

    /// A successful catalog containing `tools`
    pub fn catalog(tools: &[ToolIndexEntry]) -> Self {
        Self::json(200, serde_json::json!({ "tools": tools }))
    }

    /// A successful settings payload with one flag set
    pub fn settings_flag(key: &str, value: Value) -> Self {
        Self::json(200, serde_json::json!({ "settings": { key: value } }))
    }
}

enum Scripted {
    Ready(MockReply),
    Deferred(oneshot::Receiver<MockReply>),
}

/// Replies for one endpoint: a queue consumed first, then a fallback
struct Script {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Mutex<MockReply>,
    calls: AtomicUsize,
}

impl Script {
    fn new(fallback: MockReply) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, reply: MockReply) {
        self.queue.lock().push_back(Scripted::Ready(reply));
    }

    fn defer(&self) -> oneshot::Sender<MockReply> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().push_back(Scripted::Deferred(rx));
        tx
    }

    async fn next(&self) -> MockReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.queue.lock().pop_front();
        let rx = match scripted {
            Some(Scripted::Ready(reply)) => return reply,
            Some(Scripted::Deferred(rx)) => rx,
            None => return self.fallback.lock().clone(),
        };
        rx.await
            .unwrap_or_else(|_| MockReply::transport("request dropped"))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn resolve<T>(reply: MockReply, interpret: fn(u16, &str) -> ProviderResult<T>) -> ProviderResult<T> {
    match reply {
        MockReply::Body { status, body } => interpret(status, &body),
        MockReply::TransportError(message) => Err(ProviderError::Transport(message)),
    }
}

/// Scriptable stand-in for every collaborator
///
/// By default the catalog is empty, the prerequisite flag is unset and
/// memory lookups return 404.
pub struct MockBackend {
    catalog: Script,
    settings: Script,
    memory: Script,
    memory_requests: Mutex<Vec<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            catalog: Script::new(MockReply::json(200, serde_json::json!({ "tools": [] }))),
            settings: Script::new(MockReply::json(200, serde_json::json!({ "settings": {} }))),
            memory: Script::new(MockReply::text(404, "Not found")),
            memory_requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose catalog always contains `tools`
    pub fn with_catalog(tools: &[ToolIndexEntry]) -> Self {
        let backend = Self::new();
        backend.set_catalog(MockReply::catalog(tools));
        backend
    }

    /// Reply used for every catalog request once the queue is empty
    pub fn set_catalog(&self, reply: MockReply) {
        *self.catalog.fallback.lock() = reply;
    }

    /// Queue a reply for the next catalog request
    pub fn push_catalog(&self, reply: MockReply) {
        self.catalog.push(reply);
    }

    /// Queue a catalog reply that is released through the returned sender
    pub fn defer_catalog(&self) -> oneshot::Sender<MockReply> {
        self.catalog.defer()
    }

    pub fn set_settings(&self, reply: MockReply) {
        *self.settings.fallback.lock() = reply;
    }

    pub fn push_settings(&self, reply: MockReply) {
        self.settings.push(reply);
    }

    pub fn defer_settings(&self) -> oneshot::Sender<MockReply> {
        self.settings.defer()
    }

    pub fn set_memory(&self, reply: MockReply) {
        *self.memory.fallback.lock() = reply;
    }

    pub fn push_memory(&self, reply: MockReply) {
        self.memory.push(reply);
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog.calls()
    }

    pub fn settings_calls(&self) -> usize {
        self.settings.calls()
    }

    /// Memory requests seen so far, as `"METHOD key"`
    pub fn memory_requests(&self) -> Vec<String> {
        self.memory_requests.lock().clone()
    }

    fn record_memory(&self, request: String) {
        self.memory_requests.lock().push(request);
    }
}

#[async_trait]
impl CatalogProvider for MockBackend {
    async fn fetch_catalog(&self) -> ProviderResult<CatalogResponse> {
        resolve(self.catalog.next().await, catalog_reply)
    }
}

#[async_trait]
impl SettingsProvider for MockBackend {
    async fn fetch_settings(&self) -> ProviderResult<Value> {
        resolve(self.settings.next().await, settings_reply)
    }
}

#[async_trait]
impl MemoryBackend for MockBackend {
    async fn get_memory(&self, key: &str) -> ProviderResult<Value> {
        self.record_memory(format!("GET {}", key));
        resolve(self.memory.next().await, passthrough_reply)
    }

    async fn delete_memory(&self, key: &str) -> ProviderResult<Value> {
        self.record_memory(format!("DELETE {}", key));
        resolve(self.memory.next().await, passthrough_reply)
    }

    async fn list_memory(&self) -> ProviderResult<Value> {
        self.record_memory("LIST".to_string());
        resolve(self.memory.next().await, passthrough_reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCategory;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let backend = MockBackend::new();
        backend.push_catalog(MockReply::text(500, ""));

        assert!(backend.fetch_catalog().await.is_err());
        assert!(backend.fetch_catalog().await.unwrap().into_tools().is_empty());
        assert_eq!(backend.catalog_calls(), 2);
    }

    #[tokio::test]
    async fn test_with_catalog() {
        let tool = ToolIndexEntry::new("timer", "Timer", "Countdowns", ToolCategory::Utility);
        let backend = MockBackend::with_catalog(&[tool.clone()]);

        let tools = backend.fetch_catalog().await.unwrap().into_tools();
        assert_eq!(tools, vec![tool]);
    }

    #[tokio::test]
    async fn test_transport_error() {
        let backend = MockBackend::new();
        backend.push_settings(MockReply::transport("connection reset"));

        let err = backend.fetch_settings().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_deferred_reply() {
        let backend = MockBackend::new();
        let release = backend.defer_settings();
        release
            .send(MockReply::settings_flag("n8n_enabled", json!(true)))
            .unwrap();

        let value = backend.fetch_settings().await.unwrap();
        assert_eq!(value["settings"]["n8n_enabled"], json!(true));
    }

    #[tokio::test]
    async fn test_dropped_deferred_reply_is_transport_error() {
        let backend = MockBackend::new();
        drop(backend.defer_catalog());

        assert!(backend.fetch_catalog().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_memory_requests_recorded() {
        let backend = MockBackend::new();
        let _ = backend.get_memory("flight").await;
        let _ = backend.delete_memory("flight").await;
        let _ = backend.list_memory().await;

        assert_eq!(backend.memory_requests(), vec!["GET flight", "DELETE flight", "LIST"]);
    }
}
