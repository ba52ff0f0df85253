// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::AppError,
        money::{checked_price, MAX_PRICE},
    },
    config::AppState,
    models::inventory::{
        Item, ItemCategory, ItemWithStatus, NewItem, StockChange, DEFAULT_MIN_STOCK,
    },
    services::state::SyncSummary,
};

// ---
// Validação Customizada
// ---
fn validate_price(val: &Decimal) -> Result<(), ValidationError> {
    if checked_price(*val).is_err() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &MAX_PRICE.to_string());
        err.message = Some("Preço fora da faixa permitida.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("length");
        err.message = Some("O nome é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

fn default_min_stock() -> i32 {
    DEFAULT_MIN_STOCK
}

fn default_amount() -> i32 {
    1
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(default)]
    pub category: ItemCategory,

    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub quantity: i32,

    #[serde(default = "default_min_stock")]
    #[validate(range(min = 0, message = "O mínimo não pode ser negativo."))]
    pub min_stock: i32,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

impl From<CreateItemPayload> for NewItem {
    fn from(payload: CreateItemPayload) -> Self {
        Self {
            name: payload.name.trim().to_string(),
            category: payload.category,
            quantity: payload.quantity,
            min_stock: payload.min_stock,
            price: checked_price(payload.price).unwrap_or(payload.price),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RestockPayload {
    #[serde(default = "default_amount")]
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub amount: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetQuantityPayload {
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemSearchQuery {
    /// Trecho do nome (sem diferenciar maiúsculas)
    pub search: Option<String>,
}

// ---
// Handlers
// ---
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Inventory",
    params(ItemSearchQuery),
    responses(
        (status = 200, description = "Itens com status de estoque", body = [ItemWithStatus]),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_items(
    State(app_state): State<AppState>,
    Query(query): Query<ItemSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state
        .inventory_service
        .list_items(query.search.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Inventory",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Produto cadastrado", body = Item),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.inventory_service.create_item(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.inventory_service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Botão "-": baixa de 1 unidade que vira venda
#[utoipa::path(
    post,
    path = "/api/items/{id}/sell",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Estoque atualizado (e venda, se havia estoque)", body = StockChange),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn sell_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let change = app_state.inventory_service.sell_one(id).await?;
    Ok((StatusCode::OK, Json(change)))
}

#[utoipa::path(
    post,
    path = "/api/items/{id}/restock",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = RestockPayload,
    responses(
        (status = 200, description = "Estoque reposto", body = Item),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn restock_item(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RestockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state.inventory_service.restock(id, payload.amount).await?;
    Ok((StatusCode::OK, Json(item)))
}

// Correção manual do estoque: não gera venda
#[utoipa::path(
    put,
    path = "/api/items/{id}/quantity",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = SetQuantityPayload,
    responses(
        (status = 200, description = "Estoque corrigido", body = Item),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_item_quantity(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetQuantityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = app_state
        .inventory_service
        .set_quantity(id, payload.quantity)
        .await?;
    Ok((StatusCode::OK, Json(item)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    pub synced: SyncSummary,
}

// "Sincronizando dados...": recarrega o espelho inteiro do banco
#[utoipa::path(
    post,
    path = "/api/sync",
    tag = "Inventory",
    responses(
        (status = 200, description = "Contagem do que foi carregado", body = SyncResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_data(State(app_state): State<AppState>) -> Result<Json<SyncResponse>, AppError> {
    let synced = app_state.estoque.refresh().await?;
    Ok(Json(SyncResponse { synced }))
}
