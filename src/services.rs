pub mod auth;
pub mod inventory_service;
pub mod kit_service;
pub mod sales_service;
pub mod state;
pub mod sync;

pub use auth::AuthService;
pub use inventory_service::InventoryService;
pub use kit_service::KitService;
pub use sales_service::SalesService;
pub use state::Estoque;
