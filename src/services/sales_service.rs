// src/services/sales_service.rs

use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::format_brl},
    db::Store,
    models::sales::{DailySummary, NewSale, Sale, SalesFilter, SalesReport},
    services::state::{Estoque, EstoqueState},
};

// Relógio da loja: a venda guarda a hora local, sem fuso
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Grava uma linha no livro-caixa e coloca no topo do espelho.
/// Chamado com o lock do estado já na mão.
pub(crate) async fn register_sale(
    store: &dyn Store,
    state: &mut EstoqueState,
    item_id: Option<Uuid>,
    item_name: String,
    price: Decimal,
) -> Result<Sale, AppError> {
    let new_sale = NewSale {
        item_id,
        item_name,
        price,
        date: local_now(),
    };
    let sale = store.insert_sale(&new_sale).await?;
    state.sales.insert(0, sale.clone());

    tracing::info!("💰 Venda registrada: {} ({})", sale.item_name, format_brl(sale.price));
    Ok(sale)
}

#[derive(Clone)]
pub struct SalesService {
    estoque: Estoque,
}

impl SalesService {
    pub fn new(estoque: Estoque) -> Self {
        Self { estoque }
    }

    pub async fn report(&self, filter: &SalesFilter) -> Result<SalesReport, AppError> {
        let state = self.estoque.lock().await?;
        Ok(SalesReport::build(&state.sales, filter))
    }

    /// Cards "Faturamento Hoje" e "Vendas Hoje"; ignora o filtro do relatório.
    pub async fn today(&self) -> Result<DailySummary, AppError> {
        self.summary_for(local_today()).await
    }

    pub async fn summary_for(&self, day: NaiveDate) -> Result<DailySummary, AppError> {
        let state = self.estoque.lock().await?;
        Ok(DailySummary::for_day(&state.sales, day))
    }
}
