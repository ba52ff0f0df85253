// src/services/kit_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{checked_price, format_brl},
    },
    models::kits::{ComposeAction, Kit, KitDraft, KitSaleDraft, KitSaleReceipt, SaleDraftAction},
    services::{sales_service::register_sale, state::Estoque},
};

#[derive(Clone)]
pub struct KitService {
    estoque: Estoque,
}

impl KitService {
    pub fn new(estoque: Estoque) -> Self {
        Self { estoque }
    }

    pub async fn list_kits(&self) -> Result<Vec<Kit>, AppError> {
        let state = self.estoque.lock().await?;
        Ok(state.kits.clone())
    }

    /// Aplica uma ação de montagem no rascunho, com os preços atuais.
    pub async fn compose(&self, mut draft: KitDraft, action: ComposeAction) -> Result<KitDraft, AppError> {
        let state = self.estoque.lock().await?;
        draft.apply(&state.items, action)?;
        Ok(draft)
    }

    // --- CREATE KIT ---
    // Monta a receita linha a linha e salva com o preço derivado.
    pub async fn create_kit(&self, name: &str, lines: &[(Uuid, i32)]) -> Result<Kit, AppError> {
        let mut state = self.estoque.lock().await?;

        let mut draft = KitDraft::new(name);
        for (item_id, qty) in lines {
            draft.add_line(&state.items, *item_id, *qty)?;
        }
        let new_kit = draft.into_new_kit(&state.items)?;

        let kit = self.estoque.store().insert_kit(&new_kit).await?;
        state.kits.push(kit.clone());
        state.kits.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::info!("🧺 Kit criado: {} ({})", kit.name, format_brl(kit.price));
        Ok(kit)
    }

    pub async fn delete_kit(&self, id: Uuid) -> Result<(), AppError> {
        let mut state = self.estoque.lock().await?;
        self.estoque.store().delete_kit(id).await?;
        state.kits.retain(|k| k.id != id);

        tracing::info!("🗑️ Kit excluído: {}", id);
        Ok(())
    }

    // ---
    // Venda de kit
    // ---

    /// Abre o buffer de venda: uma cópia do kit salvo.
    pub async fn open_sale(&self, kit_id: Uuid) -> Result<KitSaleDraft, AppError> {
        let state = self.estoque.lock().await?;
        let kit = state
            .kits
            .iter()
            .find(|k| k.id == kit_id)
            .ok_or(AppError::KitNotFound(kit_id))?;
        Ok(KitSaleDraft::from_kit(kit))
    }

    pub async fn edit_sale(
        &self,
        mut draft: KitSaleDraft,
        action: SaleDraftAction,
    ) -> Result<KitSaleDraft, AppError> {
        let state = self.estoque.lock().await?;
        draft.apply(&state.items, action)?;
        Ok(draft)
    }

    /// Confere o estoque, registra UMA venda e baixa os componentes.
    ///
    /// A conferência e a gravação da venda acontecem antes de qualquer baixa:
    /// faltando estoque ou falhando a venda, nada muda. As baixas por
    /// componente são independentes; se alguma falhar no banco, as outras
    /// seguem e o id do componente volta em `failed_components`.
    pub async fn confirm_sale(&self, draft: &KitSaleDraft) -> Result<KitSaleReceipt, AppError> {
        let price = checked_price(draft.price)?;
        if let Some(bad) = draft.contents.iter().find(|c| c.qty <= 0) {
            return Err(AppError::InvalidQuantity(bad.qty));
        }

        let mut state = self.estoque.lock().await?;

        if let Some(shortfall) = draft.first_shortfall(&state.items) {
            tracing::warn!(
                "⚠️ Estoque insuficiente para {}: {} pedido(s), {} disponível(is).",
                shortfall.item_name,
                shortfall.requested,
                shortfall.available
            );
            return Err(AppError::InsufficientStock(shortfall.item_name));
        }

        let sale = register_sale(
            self.estoque.store(),
            &mut state,
            None,
            draft.sale_label(),
            price,
        )
        .await?;

        let mut updated_items = Vec::new();
        let mut failed_components = Vec::new();

        for (item_id, requested) in draft.demand() {
            let Some(current) = state.item(item_id).map(|i| i.quantity) else {
                continue;
            };
            let new_qty = current - requested;

            match self.estoque.store().update_item_quantity(item_id, new_qty).await {
                Ok(()) => {
                    if let Some(local) = state.item_mut(item_id) {
                        local.quantity = new_qty;
                        updated_items.push(local.clone());
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️ Falha ao baixar componente {} do kit: {}", item_id, e);
                    failed_components.push(item_id);
                }
            }
        }

        Ok(KitSaleReceipt {
            sale,
            updated_items,
            failed_components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MemoryStore, Store},
        models::inventory::{Item, ItemCategory, NewItem},
    };
    use rust_decimal::Decimal;
    use std::sync::Arc;

    async fn add(store: &MemoryStore, name: &str, cents: i64, quantity: i32) -> Item {
        store
            .insert_item(&NewItem {
                name: name.into(),
                category: ItemCategory::Fritos,
                quantity,
                min_stock: 10,
                price: Decimal::new(cents, 2),
            })
            .await
            .unwrap()
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        service: KitService,
        coxinha: Item,
        risoles: Item,
        combo: Kit,
    }

    async fn fixture(coxinha_stock: i32, risoles_stock: i32) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let coxinha = add(&store, "Coxinha", 350, coxinha_stock).await;
        let risoles = add(&store, "Risoles", 400, risoles_stock).await;
        let service = KitService::new(Estoque::new(store.clone()));
        let combo = service
            .create_kit("Combo", &[(coxinha.id, 2), (risoles.id, 1)])
            .await
            .unwrap();
        Fixture { store, service, coxinha, risoles, combo }
    }

    #[tokio::test]
    async fn created_kit_is_priced_from_items() {
        let f = fixture(5, 5).await;
        assert_eq!(f.combo.price, Decimal::new(1100, 2));
        assert_eq!(f.combo.contents.len(), 2);
        assert_eq!(f.store.kits().len(), 1);
    }

    #[tokio::test]
    async fn empty_kit_is_refused() {
        let f = fixture(5, 5).await;
        assert!(matches!(f.service.create_kit("Nada", &[]).await, Err(AppError::EmptyKit)));
        assert_eq!(f.store.kits().len(), 1);
    }

    #[tokio::test]
    async fn shortfall_changes_nothing() {
        let f = fixture(1, 5).await;
        let draft = f.service.open_sale(f.combo.id).await.unwrap();

        let err = f.service.confirm_sale(&draft).await.unwrap_err();
        assert_eq!(err.to_string(), "Faltam: Coxinha");

        assert_eq!(f.store.item(f.coxinha.id).unwrap().quantity, 1);
        assert_eq!(f.store.item(f.risoles.id).unwrap().quantity, 5);
        assert!(f.store.sales().is_empty());
    }

    #[tokio::test]
    async fn successful_sale_logs_one_row() {
        let f = fixture(5, 5).await;
        let draft = f.service.open_sale(f.combo.id).await.unwrap();

        let receipt = f.service.confirm_sale(&draft).await.unwrap();

        assert_eq!(receipt.sale.item_id, None);
        assert_eq!(receipt.sale.item_name, "KIT: Combo (Venda)");
        assert_eq!(receipt.sale.price, Decimal::new(1100, 2));
        assert!(receipt.failed_components.is_empty());
        assert_eq!(receipt.updated_items.len(), 2);

        assert_eq!(f.store.item(f.coxinha.id).unwrap().quantity, 3);
        assert_eq!(f.store.item(f.risoles.id).unwrap().quantity, 4);
        assert_eq!(f.store.sales().len(), 1);
    }

    #[tokio::test]
    async fn edited_sale_uses_buffer_and_keeps_template() {
        let f = fixture(5, 5).await;
        let draft = f.service.open_sale(f.combo.id).await.unwrap();
        let draft = f
            .service
            .edit_sale(draft, SaleDraftAction::AddItem { item_id: f.risoles.id, qty: 2 })
            .await
            .unwrap();
        let draft = f
            .service
            .edit_sale(draft, SaleDraftAction::OverridePrice { price: Decimal::new(1500, 2) })
            .await
            .unwrap();
        let draft = f
            .service
            .edit_sale(draft, SaleDraftAction::Rename { name: "Combo Festa".into() })
            .await
            .unwrap();

        let receipt = f.service.confirm_sale(&draft).await.unwrap();

        assert_eq!(receipt.sale.price, Decimal::new(1500, 2));
        assert_eq!(receipt.sale.item_name, "KIT: Combo Festa (Venda)");
        assert_eq!(f.store.item(f.risoles.id).unwrap().quantity, 2);

        let kits = f.service.list_kits().await.unwrap();
        assert_eq!(kits[0], f.combo);
    }

    #[tokio::test]
    async fn partial_failure_still_records_the_sale() {
        let f = fixture(5, 5).await;
        f.store.fail_updates_for(f.risoles.id);
        let draft = f.service.open_sale(f.combo.id).await.unwrap();

        let receipt = f.service.confirm_sale(&draft).await.unwrap();

        assert_eq!(receipt.failed_components, vec![f.risoles.id]);
        assert_eq!(f.store.item(f.coxinha.id).unwrap().quantity, 3);
        assert_eq!(f.store.item(f.risoles.id).unwrap().quantity, 5);
        assert_eq!(f.store.sales().len(), 1);
    }

    #[tokio::test]
    async fn failed_sale_insert_changes_no_stock() {
        let f = fixture(5, 5).await;
        f.store.fail_sales(true);
        let draft = f.service.open_sale(f.combo.id).await.unwrap();

        assert!(f.service.confirm_sale(&draft).await.is_err());

        assert_eq!(f.store.item(f.coxinha.id).unwrap().quantity, 5);
        assert_eq!(f.store.item(f.risoles.id).unwrap().quantity, 5);
        assert!(f.store.sales().is_empty());
    }

    #[tokio::test]
    async fn price_beyond_ledger_range_is_refused_before_any_write() {
        let f = fixture(5, 5).await;
        let mut draft = f.service.open_sale(f.combo.id).await.unwrap();
        draft.price = Decimal::new(1_000_000_000_000, 0);

        assert!(matches!(
            f.service.confirm_sale(&draft).await,
            Err(AppError::InvalidPrice(_))
        ));
        assert_eq!(f.store.item(f.coxinha.id).unwrap().quantity, 5);
        assert!(f.store.sales().is_empty());
    }

    #[tokio::test]
    async fn sale_price_is_rounded_to_cents() {
        let f = fixture(5, 5).await;
        let mut draft = f.service.open_sale(f.combo.id).await.unwrap();
        draft.price = Decimal::new(12_345, 3);

        let receipt = f.service.confirm_sale(&draft).await.unwrap();
        assert_eq!(receipt.sale.price, Decimal::new(1235, 2));
    }

    #[tokio::test]
    async fn deleting_kit_keeps_items() {
        let f = fixture(5, 5).await;
        f.service.delete_kit(f.combo.id).await.unwrap();

        assert!(f.service.list_kits().await.unwrap().is_empty());
        assert!(f.store.item(f.coxinha.id).is_some());
        assert!(matches!(f.service.open_sale(f.combo.id).await, Err(AppError::KitNotFound(_))));
    }

    #[tokio::test]
    async fn compose_prices_against_live_items() {
        let f = fixture(5, 5).await;
        let draft = f
            .service
            .compose(KitDraft::new("Trio"), ComposeAction::AddLine { item_id: f.coxinha.id, qty: 3 })
            .await
            .unwrap();
        assert_eq!(draft.price, Decimal::new(1050, 2));

        let draft = f
            .service
            .compose(draft, ComposeAction::RemoveLine { index: 0 })
            .await
            .unwrap();
        assert!(draft.contents.is_empty());
        assert_eq!(draft.price, Decimal::ZERO);
    }
}
