// src/db/inventory_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Item, NewItem},
};

// Repositório da tabela 'items'
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all_items(&self) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, category, quantity, min_stock, price FROM items ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn create_item(&self, item: &NewItem) -> Result<Item, AppError> {
        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category, quantity, min_stock, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, category, quantity, min_stock, price
            "#,
        )
        .bind(&item.name)
        .bind(item.category)
        .bind(item.quantity)
        .bind(item.min_stock)
        .bind(item.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Grava o saldo absoluto do item.
    pub async fn set_quantity(&self, id: Uuid, quantity: i32) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE items SET quantity = $2 WHERE id = $1")
            .bind(id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ItemNotFound(id));
        }
        Ok(())
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ItemNotFound(id));
        }
        Ok(())
    }
}
