// src/handlers/kits.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::kits::{ComposeAction, Kit, KitDraft, KitSaleDraft, KitSaleReceipt, SaleDraftAction},
};

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KitLinePayload {
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub qty: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateKitPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(nested)]
    #[serde(default)]
    pub contents: Vec<KitLinePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ComposePayload {
    #[serde(default)]
    pub draft: KitDraft,
    pub action: ComposeAction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EditSaleDraftPayload {
    pub draft: KitSaleDraft,
    pub action: SaleDraftAction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmKitSalePayload {
    pub draft: KitSaleDraft,
}

// ---
// Receitas (kits salvos)
// ---
#[utoipa::path(
    get,
    path = "/api/kits",
    tag = "Kits",
    responses((status = 200, description = "Kits salvos", body = [Kit])),
    security(("api_jwt" = []))
)]
pub async fn get_all_kits(State(app_state): State<AppState>) -> Result<Json<Vec<Kit>>, AppError> {
    let kits = app_state.kit_service.list_kits().await?;
    Ok(Json(kits))
}

// "Salvar Receita do Kit": o preço é sempre calculado a partir dos itens
#[utoipa::path(
    post,
    path = "/api/kits",
    tag = "Kits",
    request_body = CreateKitPayload,
    responses(
        (status = 201, description = "Kit criado", body = Kit),
        (status = 400, description = "Kit sem nome ou sem itens")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_kit(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateKitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines: Vec<(Uuid, i32)> = payload
        .contents
        .iter()
        .map(|line| (line.item_id, line.qty))
        .collect();
    let kit = app_state.kit_service.create_kit(&payload.name, &lines).await?;

    Ok((StatusCode::CREATED, Json(kit)))
}

#[utoipa::path(
    delete,
    path = "/api/kits/{id}",
    tag = "Kits",
    params(("id" = Uuid, Path, description = "ID do kit")),
    responses(
        (status = 204, description = "Kit excluído"),
        (status = 404, description = "Kit não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_kit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.kit_service.delete_kit(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Montagem passo a passo: devolve o rascunho com o preço recalculado
#[utoipa::path(
    post,
    path = "/api/kits/compose",
    tag = "Kits",
    request_body = ComposePayload,
    responses(
        (status = 200, description = "Rascunho atualizado", body = KitDraft),
        (status = 404, description = "Item ou linha não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn compose_kit(
    State(app_state): State<AppState>,
    Json(payload): Json<ComposePayload>,
) -> Result<Json<KitDraft>, AppError> {
    let draft = app_state
        .kit_service
        .compose(payload.draft, payload.action)
        .await?;
    Ok(Json(draft))
}

// ---
// Venda personalizada
// ---
#[utoipa::path(
    get,
    path = "/api/kits/{id}/sale-draft",
    tag = "Kits",
    params(("id" = Uuid, Path, description = "ID do kit")),
    responses(
        (status = 200, description = "Cópia editável do kit", body = KitSaleDraft),
        (status = 404, description = "Kit não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn open_kit_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<KitSaleDraft>, AppError> {
    let draft = app_state.kit_service.open_sale(id).await?;
    Ok(Json(draft))
}

#[utoipa::path(
    post,
    path = "/api/kits/sale-draft/edit",
    tag = "Kits",
    request_body = EditSaleDraftPayload,
    responses(
        (status = 200, description = "Buffer de venda atualizado", body = KitSaleDraft),
        (status = 400, description = "Quantidade ou preço inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn edit_kit_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<EditSaleDraftPayload>,
) -> Result<Json<KitSaleDraft>, AppError> {
    let draft = app_state
        .kit_service
        .edit_sale(payload.draft, payload.action)
        .await?;
    Ok(Json(draft))
}

// "Confirmar e Vender"
#[utoipa::path(
    post,
    path = "/api/kits/sale",
    tag = "Kits",
    request_body = ConfirmKitSalePayload,
    responses(
        (status = 201, description = "Venda realizada", body = KitSaleReceipt),
        (status = 409, description = "Estoque insuficiente (Faltam: item)")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_kit_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<ConfirmKitSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = app_state.kit_service.confirm_sale(&payload.draft).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
