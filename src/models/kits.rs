// src/models/kits.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::checked_price},
    models::{inventory::Item, sales::Sale},
};

// --- CONTEÚDO DO KIT ---
// item_name é uma cópia do nome no momento da montagem (não acompanha renomeações).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KitContent {
    pub item_id: Uuid,
    pub item_name: String,
    pub qty: i32,
}

// --- KIT (receita padrão salva) ---
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub contents: Vec<KitContent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewKit {
    pub name: String,
    pub price: Decimal,
    pub contents: Vec<KitContent>,
}

/// Soma (preço atual do item × qty). Item que não existe mais vale 0.
pub fn contents_price(contents: &[KitContent], items: &[Item]) -> Decimal {
    contents
        .iter()
        .map(|c| {
            let price = items
                .iter()
                .find(|i| i.id == c.item_id)
                .map(|i| i.price)
                .unwrap_or(Decimal::ZERO);
            price * Decimal::from(c.qty)
        })
        .sum()
}

fn find_item(items: &[Item], item_id: Uuid) -> Result<&Item, AppError> {
    items
        .iter()
        .find(|i| i.id == item_id)
        .ok_or(AppError::ItemNotFound(item_id))
}

fn ensure_positive_qty(qty: i32) -> Result<(), AppError> {
    if qty <= 0 {
        return Err(AppError::InvalidQuantity(qty));
    }
    Ok(())
}

// ---
// Montagem de um kit novo (tela "Montar Novo Kit")
// ---
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KitDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub contents: Vec<KitContent>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComposeAction {
    #[serde(rename_all = "camelCase")]
    AddLine { item_id: Uuid, qty: i32 },
    RemoveLine { index: usize },
}

impl KitDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Sempre acrescenta uma linha nova, mesmo que o item já esteja no kit.
    pub fn add_line(&mut self, items: &[Item], item_id: Uuid, qty: i32) -> Result<(), AppError> {
        ensure_positive_qty(qty)?;
        let item = find_item(items, item_id)?;
        self.contents.push(KitContent {
            item_id: item.id,
            item_name: item.name.clone(),
            qty,
        });
        self.recompute_price(items);
        Ok(())
    }

    pub fn remove_line(&mut self, items: &[Item], index: usize) -> Result<(), AppError> {
        if index >= self.contents.len() {
            return Err(AppError::LineNotFound(index));
        }
        self.contents.remove(index);
        self.recompute_price(items);
        Ok(())
    }

    pub fn recompute_price(&mut self, items: &[Item]) {
        self.price = contents_price(&self.contents, items);
    }

    pub fn apply(&mut self, items: &[Item], action: ComposeAction) -> Result<(), AppError> {
        match action {
            ComposeAction::AddLine { item_id, qty } => self.add_line(items, item_id, qty),
            ComposeAction::RemoveLine { index } => self.remove_line(items, index),
        }
    }

    /// Valida e fecha o rascunho. O preço é sempre recalculado aqui.
    pub fn into_new_kit(mut self, items: &[Item]) -> Result<NewKit, AppError> {
        let name = self.name.trim().to_string();
        if name.is_empty() || self.contents.is_empty() {
            return Err(AppError::EmptyKit);
        }
        if let Some(bad) = self.contents.iter().find(|c| c.qty <= 0) {
            return Err(AppError::InvalidQuantity(bad.qty));
        }
        self.recompute_price(items);
        Ok(NewKit {
            name,
            price: checked_price(self.price)?,
            contents: self.contents,
        })
    }
}

// ---
// Venda personalizada de kit (modal "Personalizar Venda")
// ---
// Cópia independente do kit salvo: editar aqui nunca altera a receita.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KitSaleDraft {
    pub kit_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub contents: Vec<KitContent>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SaleDraftAction {
    AdjustLine { index: usize, delta: i32 },
    #[serde(rename_all = "camelCase")]
    AddItem { item_id: Uuid, qty: i32 },
    Rename { name: String },
    OverridePrice { price: Decimal },
}

// Falta de estoque encontrada na conferência
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub item_id: Uuid,
    pub item_name: String,
    pub requested: i32,
    pub available: i32,
}

impl KitSaleDraft {
    pub fn from_kit(kit: &Kit) -> Self {
        Self {
            kit_id: kit.id,
            name: kit.name.clone(),
            price: kit.price,
            contents: kit.contents.clone(),
        }
    }

    /// Soma `delta` à linha; chegando a 0 a linha sai do kit.
    pub fn adjust_line(&mut self, items: &[Item], index: usize, delta: i32) -> Result<(), AppError> {
        let line = self
            .contents
            .get_mut(index)
            .ok_or(AppError::LineNotFound(index))?;
        line.qty = line.qty.saturating_add(delta).max(0);
        if line.qty == 0 {
            self.contents.remove(index);
        }
        self.price = contents_price(&self.contents, items);
        Ok(())
    }

    /// Ao contrário da montagem, aqui o item repetido soma na linha existente.
    pub fn add_item(&mut self, items: &[Item], item_id: Uuid, qty: i32) -> Result<(), AppError> {
        ensure_positive_qty(qty)?;
        let item = find_item(items, item_id)?;
        match self.contents.iter_mut().find(|c| c.item_id == item.id) {
            Some(line) => line.qty = line.qty.saturating_add(qty),
            None => self.contents.push(KitContent {
                item_id: item.id,
                item_name: item.name.clone(),
                qty,
            }),
        }
        self.price = contents_price(&self.contents, items);
        Ok(())
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Preço combinado com o cliente, em centavos e dentro da faixa do banco.
    pub fn override_price(&mut self, price: Decimal) -> Result<(), AppError> {
        self.price = checked_price(price)?;
        Ok(())
    }

    pub fn apply(&mut self, items: &[Item], action: SaleDraftAction) -> Result<(), AppError> {
        match action {
            SaleDraftAction::AdjustLine { index, delta } => self.adjust_line(items, index, delta),
            SaleDraftAction::AddItem { item_id, qty } => self.add_item(items, item_id, qty),
            SaleDraftAction::Rename { name } => {
                self.rename(name);
                Ok(())
            }
            SaleDraftAction::OverridePrice { price } => self.override_price(price),
        }
    }

    pub fn sale_label(&self) -> String {
        format!("KIT: {} (Venda)", self.name)
    }

    /// Quantidade total pedida por item, na ordem em que aparecem.
    pub fn demand(&self) -> Vec<(Uuid, i32)> {
        let mut order: Vec<Uuid> = Vec::new();
        let mut totals: HashMap<Uuid, i32> = HashMap::new();
        for line in &self.contents {
            let total = totals.entry(line.item_id).or_insert_with(|| {
                order.push(line.item_id);
                0
            });
            *total = total.saturating_add(line.qty);
        }
        order.into_iter().map(|id| (id, totals[&id])).collect()
    }

    /// Primeira linha sem estoque suficiente. Linhas repetidas do mesmo item
    /// somam a demanda, para o estoque nunca ficar negativo.
    pub fn first_shortfall(&self, items: &[Item]) -> Option<Shortfall> {
        let mut requested: HashMap<Uuid, i32> = HashMap::new();
        for line in &self.contents {
            let total = requested.entry(line.item_id).or_insert(0);
            *total = total.saturating_add(line.qty);
            let available = items
                .iter()
                .find(|i| i.id == line.item_id)
                .map(|i| i.quantity);
            match available {
                Some(stock) if stock >= *total => continue,
                _ => {
                    return Some(Shortfall {
                        item_id: line.item_id,
                        item_name: line.item_name.clone(),
                        requested: *total,
                        available: available.unwrap_or(0),
                    });
                }
            }
        }
        None
    }
}

// Comprovante da venda de kit
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KitSaleReceipt {
    pub sale: Sale,
    pub updated_items: Vec<Item>,
    // Componentes cuja baixa falhou no banco (a venda foi registrada mesmo assim)
    pub failed_components: Vec<Uuid>,
}
