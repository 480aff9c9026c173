pub mod machine;
mod memory_store;
mod postgres_store;
mod service;
mod store;

pub use memory_store::MemoryLifecycleStore;
pub use postgres_store::PgLifecycleStore;
pub use service::LifecycleService;
pub use store::LifecycleStore;
