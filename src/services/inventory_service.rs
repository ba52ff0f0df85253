// src/services/inventory_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Item, ItemWithStatus, NewItem, StockChange},
    services::{
        sales_service::register_sale,
        state::{Estoque, EstoqueState},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    estoque: Estoque,
}

impl InventoryService {
    pub fn new(estoque: Estoque) -> Self {
        Self { estoque }
    }

    /// Listagem com o filtro "Buscar salgado..." (contém, sem diferenciar maiúsculas).
    pub async fn list_items(&self, search: Option<&str>) -> Result<Vec<ItemWithStatus>, AppError> {
        let state = self.estoque.lock().await?;
        let term = search.map(str::trim).unwrap_or_default().to_lowercase();

        Ok(state
            .items
            .iter()
            .filter(|item| term.is_empty() || item.name.to_lowercase().contains(&term))
            .cloned()
            .map(ItemWithStatus::from)
            .collect())
    }

    // --- CREATE ITEM ---
    pub async fn create_item(&self, new_item: NewItem) -> Result<Item, AppError> {
        let mut state = self.estoque.lock().await?;
        let item = self.estoque.store().insert_item(&new_item).await?;
        state.items.push(item.clone());
        state.items.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!("📦 Produto cadastrado: {}", item.name);
        Ok(item)
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.estoque.lock().await?;
        self.estoque.store().delete_item(id).await?;
        state.items.retain(|i| i.id != id);

        tracing::info!("🗑️ Produto excluído: {}", id);
        Ok(())
    }

    // --- SELL ONE (botão "-") ---
    // Baixa de 1 unidade que vira venda. Com estoque zerado nada acontece.
    // A venda é gravada primeiro: se ela falhar, nada muda. Se a baixa falhar
    // depois, a venda fica e a resposta sai com `stock_updated = false`.
    pub async fn sell_one(&self, id: Uuid) -> Result<StockChange, AppError> {
        let mut state = self.estoque.lock().await?;
        let item = state.item(id).cloned().ok_or(AppError::ItemNotFound(id))?;

        if item.quantity <= 0 {
            tracing::warn!("⚠️ Baixa ignorada, estoque zerado: {}", item.name);
            return Ok(StockChange { item, sale: None, stock_updated: false });
        }

        let sale = register_sale(
            self.estoque.store(),
            &mut state,
            Some(item.id),
            item.name.clone(),
            item.price,
        )
        .await?;

        let new_qty = item.quantity - 1;
        match self.estoque.store().update_item_quantity(id, new_qty).await {
            Ok(()) => {
                if let Some(local) = state.item_mut(id) {
                    local.quantity = new_qty;
                }
                Ok(StockChange {
                    item: Item { quantity: new_qty, ..item },
                    sale: Some(sale),
                    stock_updated: true,
                })
            }
            Err(e) => {
                tracing::warn!("⚠️ Venda de {} gravada, mas a baixa falhou: {}", item.name, e);
                Ok(StockChange { item, sale: Some(sale), stock_updated: false })
            }
        }
    }

    // --- RESTOCK (botão "+") ---
    pub async fn restock(&self, id: Uuid, amount: i32) -> Result<Item, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidQuantity(amount));
        }
        let mut state = self.estoque.lock().await?;
        let current = state.item(id).map(|i| i.quantity).ok_or(AppError::ItemNotFound(id))?;
        self.write_quantity(&mut state, id, current.saturating_add(amount)).await
    }

    // --- CORREÇÃO MANUAL ---
    // Ajuste de inventário: não é transação, não gera venda.
    pub async fn set_quantity(&self, id: Uuid, quantity: i32) -> Result<Item, AppError> {
        if quantity < 0 {
            return Err(AppError::InvalidQuantity(quantity));
        }
        let mut state = self.estoque.lock().await?;
        if state.item(id).is_none() {
            return Err(AppError::ItemNotFound(id));
        }
        self.write_quantity(&mut state, id, quantity).await
    }

    async fn write_quantity(
        &self,
        state: &mut EstoqueState,
        id: Uuid,
        quantity: i32,
    ) -> Result<Item, AppError> {
        self.estoque.store().update_item_quantity(id, quantity).await?;
        let local = state.item_mut(id).ok_or(AppError::ItemNotFound(id))?;
        local.quantity = quantity;
        Ok(local.clone())
    }
}
