//! Storage adapters behind the [`crate::ports`] traits.
//!
//! - [`ObjectAssetStore`] — figure uploads via the `object_store` crate
//!   (local filesystem in dev; any S3-compatible `ObjectStore` in prod)
//! - [`MemoryPaperStore`] — in-process paper record store for tests and the
//!   CLI dry-run path

pub mod memory;
pub mod object_asset_store;

pub use memory::MemoryPaperStore;
pub use object_asset_store::ObjectAssetStore;
