// Storage layer
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)

pub mod backend;
pub mod memory;
pub mod models;
pub mod password;
pub mod postgres;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use postgres::Database;
