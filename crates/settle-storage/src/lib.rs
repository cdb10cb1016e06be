//! SettleSpace storage crate - the key-value store the marketplace keeps
//! its collections in.
//!
//! Provides the [`KeyValueStore`] seam with a migrated, WAL-mode SQLite
//! implementation and an in-memory one, typed JSON collections on top of
//! it, and the user/listing repositories.

pub mod collection;
pub mod keys;
pub mod migrations;
pub mod repository;
pub mod seed;
pub mod sqlite;
pub mod store;

pub use collection::{Collection, Flag, JsonDocument};
pub use repository::{ListingRepository, UserRepository};
pub use seed::{seed_demo_data, SeedReport};
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
