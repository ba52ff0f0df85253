// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, KitRepository, SalesRepository, Store, UserRepository},
    models::{
        auth::User,
        inventory::{Item, NewItem},
        kits::{Kit, NewKit},
        sales::{NewSale, Sale},
    },
};

// O Store de produção: junta os repositórios sobre a mesma pool
#[derive(Clone)]
pub struct PgStore {
    inventory_repo: InventoryRepository,
    kit_repo: KitRepository,
    sales_repo: SalesRepository,
    user_repo: UserRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inventory_repo: InventoryRepository::new(pool.clone()),
            kit_repo: KitRepository::new(pool.clone()),
            sales_repo: SalesRepository::new(pool.clone()),
            user_repo: UserRepository::new(pool),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        self.inventory_repo.get_all_items().await
    }

    async fn insert_item(&self, item: &NewItem) -> Result<Item, AppError> {
        self.inventory_repo.create_item(item).await
    }

    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> Result<(), AppError> {
        self.inventory_repo.set_quantity(id, quantity).await
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        self.inventory_repo.delete_item(id).await
    }

    async fn list_kits(&self) -> Result<Vec<Kit>, AppError> {
        self.kit_repo.get_all_kits().await
    }

    async fn insert_kit(&self, kit: &NewKit) -> Result<Kit, AppError> {
        self.kit_repo.create_kit(kit).await
    }

    async fn delete_kit(&self, id: Uuid) -> Result<(), AppError> {
        self.kit_repo.delete_kit(id).await
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.sales_repo.get_all_sales().await
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, AppError> {
        self.sales_repo.record_sale(sale).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(id).await
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.user_repo.create_user(email, password_hash).await
    }
}
