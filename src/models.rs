pub mod auth;
pub mod inventory;
pub mod kits;
pub mod sales;
