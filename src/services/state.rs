// src/services/state.rs

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{RwLock, RwLockWriteGuard};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    db::Store,
    models::{inventory::Item, kits::Kit, sales::Sale},
};

// ---
// Espelho em memória das tabelas do banco
// ---
// Recarregado por inteiro no login e alterado localmente depois de cada
// escrita bem-sucedida no Store.
#[derive(Debug, Clone, Default)]
pub struct EstoqueState {
    pub items: Vec<Item>,
    pub kits: Vec<Kit>,
    // Mais recentes primeiro
    pub sales: Vec<Sale>,
    pub loaded: bool,
}

impl EstoqueState {
    pub fn item(&self, id: uuid::Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: uuid::Uuid) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub items: usize,
    pub kits: usize,
    pub sales: usize,
}

/// O controlador do estado da loja: dono do espelho e do acesso ao Store.
///
/// Os serviços compartilham um clone deste handle. Cada comando segura o
/// lock de escrita do início ao fim, então os comandos locais ficam em fila.
#[derive(Clone)]
pub struct Estoque {
    store: Arc<dyn Store>,
    state: Arc<RwLock<EstoqueState>>,
}

impl Estoque {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(EstoqueState::default())),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Busca itens, vendas e kits de novo e troca o espelho inteiro.
    pub async fn refresh(&self) -> Result<SyncSummary, AppError> {
        let mut state = self.state.write().await;
        Self::reload(self.store(), &mut state).await
    }

    /// Esvazia o espelho (logout). O próximo comando recarrega.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = EstoqueState::default();
        tracing::info!("🧹 Espelho do estoque limpo.");
    }

    #[cfg(test)]
    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// Lock de escrita com o espelho garantidamente carregado.
    pub async fn lock(&self) -> Result<RwLockWriteGuard<'_, EstoqueState>, AppError> {
        let mut state = self.state.write().await;
        if !state.loaded {
            Self::reload(self.store(), &mut state).await?;
        }
        Ok(state)
    }

    #[cfg(test)]
    pub async fn snapshot(&self) -> Result<EstoqueState, AppError> {
        let state = self.lock().await?;
        Ok(state.clone())
    }

    async fn reload(store: &dyn Store, state: &mut EstoqueState) -> Result<SyncSummary, AppError> {
        let items = store.list_items().await?;
        let sales = store.list_sales().await?;
        let kits = store.list_kits().await?;

        *state = EstoqueState { items, kits, sales, loaded: true };

        let summary = SyncSummary {
            items: state.items.len(),
            kits: state.kits.len(),
            sales: state.sales.len(),
        };
        tracing::info!(
            "🔄 Dados sincronizados: {} itens, {} kits, {} vendas.",
            summary.items,
            summary.kits,
            summary.sales
        );
        Ok(summary)
    }
}
