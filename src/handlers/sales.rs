// src/handlers/sales.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::sales::{DailySummary, SalesFilter, SalesReport},
};

// Tela "Relatórios": histórico filtrado por período e total
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(SalesFilter),
    responses(
        (status = 200, description = "Vendas do período, mais recentes primeiro", body = SalesReport),
        (status = 400, description = "Data inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sales_report(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<SalesReport>, AppError> {
    let report = app_state.sales_service.report(&filter).await?;
    Ok(Json(report))
}

// Cards do topo: faturamento e número de vendas de hoje
#[utoipa::path(
    get,
    path = "/api/sales/today",
    tag = "Sales",
    responses((status = 200, description = "Resumo do dia", body = DailySummary)),
    security(("api_jwt" = []))
)]
pub async fn get_today_summary(State(app_state): State<AppState>) -> Result<Json<DailySummary>, AppError> {
    let summary = app_state.sales_service.today().await?;
    Ok(Json(summary))
}
