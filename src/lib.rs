pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod jwk;
pub mod key_cacher;
pub mod singleflight;
pub mod token;

#[cfg(feature = "webapp")]
pub mod app;

pub use client::{JwkClient, JwkClientOptions};
pub use error::Error;
pub use jwk::{Jwk, JwkSet};
pub use key_cacher::{KeyCacher, MemoryKeyCacher};
