// src/db/kit_repo.rs

use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::kits::{Kit, KitContent, NewKit},
};

// Linha crua da tabela: o conteúdo vem como JSONB
#[derive(Debug, FromRow)]
struct KitRow {
    id: Uuid,
    name: String,
    price: Decimal,
    contents: Json<Vec<KitContent>>,
}

impl From<KitRow> for Kit {
    fn from(row: KitRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            contents: row.contents.0,
        }
    }
}

// Repositório da tabela 'kits'
#[derive(Clone)]
pub struct KitRepository {
    pool: PgPool,
}

impl KitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all_kits(&self) -> Result<Vec<Kit>, AppError> {
        let rows = sqlx::query_as::<_, KitRow>(
            "SELECT id, name, price, contents FROM kits ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Kit::from).collect())
    }

    pub async fn create_kit(&self, kit: &NewKit) -> Result<Kit, AppError> {
        let row = sqlx::query_as::<_, KitRow>(
            r#"
            INSERT INTO kits (name, price, contents)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, contents
            "#,
        )
        .bind(&kit.name)
        .bind(kit.price)
        .bind(Json(&kit.contents))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    // Excluir o kit não mexe nos itens
    pub async fn delete_kit(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM kits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::KitNotFound(id));
        }
        Ok(())
    }
}
