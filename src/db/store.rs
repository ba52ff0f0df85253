// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        inventory::{Item, NewItem},
        kits::{Kit, NewKit},
        sales::{NewSale, Sale},
    },
};

/// Armazenamento remoto das tabelas items, kits, sales e users.
///
/// Cada chamada é um pedido/resposta independente: não existe transação entre
/// chamadas, e a última escrita vence.
#[async_trait]
pub trait Store: Send + Sync {
    // --- items ---

    /// Todos os itens, ordenados por nome.
    async fn list_items(&self) -> Result<Vec<Item>, AppError>;
    async fn insert_item(&self, item: &NewItem) -> Result<Item, AppError>;
    /// Grava a quantidade absoluta (não é um delta).
    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> Result<(), AppError>;
    async fn delete_item(&self, id: Uuid) -> Result<(), AppError>;

    // --- kits ---

    /// Todos os kits, ordenados por nome.
    async fn list_kits(&self) -> Result<Vec<Kit>, AppError>;
    async fn insert_kit(&self, kit: &NewKit) -> Result<Kit, AppError>;
    async fn delete_kit(&self, id: Uuid) -> Result<(), AppError>;

    // --- sales ---

    /// Livro-caixa, mais recentes primeiro.
    async fn list_sales(&self) -> Result<Vec<Sale>, AppError>;
    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, AppError>;

    // --- users ---

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;
}
