//! Backend collaborators
//!
//! The core never talks to the network directly. It depends on three traits:
//!
//! - `CatalogProvider`: the tool registry listing
//! - `SettingsProvider`: the settings document holding the install prerequisite
//! - `MemoryBackend`: keyed memory records behind the proxy
//!
//! `HttpBackend` implements them over reqwest. `MockBackend` is kept for
//! testing. Both interpret replies through `response`, so status and error
//! text handling is identical whichever transport is used.

mod traits;
mod error;
mod response;
mod http;
mod mock;

pub use traits::{CatalogProvider, MemoryBackend, SettingsProvider};
pub use error::{ProviderError, ProviderResult};
pub use response::{
    catalog_reply, error_field, passthrough_reply, settings_reply, CatalogResponse,
};
pub use http::HttpBackend;
pub use mock::{MockBackend, MockReply};
