//! Image search providers.
//!
//! The rest of the pipeline only sees the [`SearchProvider`] trait: keyword
//! in, finite list of [`SearchHit`]s out, in whatever order the provider
//! delivers them. The production implementation is [`DuckDuckGo`], which
//! speaks the unofficial endpoint the website's own frontend uses (token
//! handshake on the HTML search page, then paged JSON from `i.js`).
//!
//! Enable the `mock` feature to get [`MockProvider`] for tests.

mod duckduckgo;
pub mod error;
mod hit;
mod provider;

pub use crate::duckduckgo::{DuckDuckGo, SafeSearch};
pub use crate::hit::SearchHit;
#[cfg(feature = "mock")]
pub use crate::provider::MockProvider;
pub use crate::provider::SearchProvider;
