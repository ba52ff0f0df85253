// src/models/sales.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::money::format_brl;

// --- VENDA (livro-caixa) ---
// item_id é None nas vendas de kit.
// item_name é uma "foto" do nome na hora da venda: não acompanha renomeações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub price: Decimal,
    // Horário local (relógio da loja), sem fuso
    pub date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn local_day(&self) -> NaiveDate {
        self.date.date()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub price: Decimal,
    pub date: NaiveDateTime,
}

// --- FILTRO DO RELATÓRIO ---
// Limites inclusivos; ausente (ou vazio) = aberto.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SalesFilter {
    /// Data inicial (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>)]
    pub start: Option<NaiveDate>,
    /// Data final (YYYY-MM-DD)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>)]
    pub end: Option<NaiveDate>,
}

impl SalesFilter {
    pub fn matches(&self, sale: &Sale) -> bool {
        let day = sale.local_day();
        self.start.is_none_or(|start| day >= start) && self.end.is_none_or(|end| day <= end)
    }

    pub fn apply<'a>(&self, sales: &'a [Sale]) -> Vec<&'a Sale> {
        sales.iter().filter(|sale| self.matches(sale)).collect()
    }
}

// O formulário manda "start=" quando o campo está limpo
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// --- RELATÓRIO (tela de histórico) ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub sales: Vec<Sale>,
    pub count: usize,
    pub total: Decimal,
    pub total_display: String,
}

impl SalesReport {
    pub fn build(ledger: &[Sale], filter: &SalesFilter) -> Self {
        let sales: Vec<Sale> = filter.apply(ledger).into_iter().cloned().collect();
        let total: Decimal = sales.iter().map(|s| s.price).sum();
        Self {
            count: sales.len(),
            total_display: format_brl(total),
            total,
            sales,
        }
    }
}

// --- RESUMO DO DIA (cards do topo) ---
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub count: usize,
    pub revenue: Decimal,
    pub revenue_display: String,
}

impl DailySummary {
    pub fn for_day(ledger: &[Sale], day: NaiveDate) -> Self {
        let todays = ledger.iter().filter(|s| s.local_day() == day);
        let (count, revenue) = todays.fold((0, Decimal::ZERO), |(n, sum), s| (n + 1, sum + s.price));
        Self {
            date: day,
            count,
            revenue,
            revenue_display: format_brl(revenue),
        }
    }
}
