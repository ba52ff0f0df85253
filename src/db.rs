pub mod store;
pub use store::Store;
pub mod pg_store;
pub use pg_store::PgStore;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod kit_repo;
pub use kit_repo::KitRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub use memory::MemoryStore;
