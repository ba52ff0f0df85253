// src/db/sales_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::sales::{NewSale, Sale},
};

// Repositório da tabela 'sales' (só leitura e inserção: o livro-caixa não é editado)
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all_sales(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, item_id, item_name, price, date, created_at
            FROM sales
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn record_sale(&self, sale: &NewSale) -> Result<Sale, AppError> {
        let created = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (item_id, item_name, price, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, item_id, item_name, price, date, created_at
            "#,
        )
        .bind(sale.item_id)
        .bind(&sale.item_name)
        .bind(sale.price)
        .bind(sale.date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
