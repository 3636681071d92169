//! Memory store proxy
//!
//! Thin get/delete/list front for the agent's memory endpoints. It does not
//! interpret entries; it forwards bodies, status codes and error text.

mod proxy;

pub use proxy::{MemoryProxy, ProxyResponse, BACKEND_FALLBACK_ERROR};
