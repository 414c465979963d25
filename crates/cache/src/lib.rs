//! Response caching for Querygate.
//!
//! Keys are content fingerprints (`fingerprint`), storage sits behind the
//! [`CacheBackend`] trait (`backend`), and the pipeline-facing wrapper with
//! hit/miss accounting and graceful degradation is [`ResponseCache`]
//! (`store`).
pub mod backend;
pub mod fingerprint;
pub mod store;

pub use backend::{CacheBackend, CacheError, MemoryBackend};
pub use fingerprint::{fingerprint, namespaced_key};
pub use store::{CacheStats, CacheStatus, ResponseCache};
