// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::sales::Sale;

// Estoque mínimo padrão usado pelo formulário de cadastro
pub const DEFAULT_MIN_STOCK: i32 = 10;

// --- Categorias fixas do cardápio ---
// Mapeia o CREATE TYPE item_category do banco
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "item_category")]
pub enum ItemCategory {
    #[default]
    Fritos,
    Assados,
    Doces,
    Bebidas,
}

// --- Item (salgado individual) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: ItemCategory,
    pub quantity: i32,
    pub min_stock: i32,
    pub price: Decimal,
}

impl Item {
    /// Status "Baixo" da listagem: o alerta dispara já no limite.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

// Dados para inserir um item (o id vem do banco)
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: ItemCategory,
    pub quantity: i32,
    pub min_stock: i32,
    pub price: Decimal,
}

// Linha da listagem: o item mais o status calculado
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithStatus {
    #[serde(flatten)]
    pub item: Item,
    pub low_stock: bool,
}

impl From<Item> for ItemWithStatus {
    fn from(item: Item) -> Self {
        let low_stock = item.is_low_stock();
        Self { item, low_stock }
    }
}

// Resultado de uma baixa unitária (botão "-")
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub item: Item,
    // Só existe quando a baixa virou venda (estoque > 0)
    pub sale: Option<Sale>,
    // false quando a venda foi gravada mas a baixa falhou no banco
    pub stock_updated: bool,
}
