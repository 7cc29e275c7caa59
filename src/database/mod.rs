pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::{Fixture, MemoryBusinessStore, MemoryCollection, MemoryStores};
pub use repository::{PgBusinessStore, PgCollection};
pub use store::{BusinessStore, PublicRecord, StoreError, TokenStore};
