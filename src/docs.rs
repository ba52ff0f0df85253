// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_session,
        handlers::auth::logout,

        // --- INVENTORY ---
        handlers::inventory::get_all_items,
        handlers::inventory::create_item,
        handlers::inventory::delete_item,
        handlers::inventory::sell_item,
        handlers::inventory::restock_item,
        handlers::inventory::set_item_quantity,
        handlers::inventory::sync_data,

        // --- KITS ---
        handlers::kits::get_all_kits,
        handlers::kits::create_kit,
        handlers::kits::delete_kit,
        handlers::kits::compose_kit,
        handlers::kits::open_kit_sale,
        handlers::kits::edit_kit_sale,
        handlers::kits::confirm_kit_sale,

        // --- SALES ---
        handlers::sales::get_sales_report,
        handlers::sales::get_today_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::Session,
            models::auth::AuthResponse,

            // --- Inventory ---
            models::inventory::ItemCategory,
            models::inventory::Item,
            models::inventory::ItemWithStatus,
            models::inventory::StockChange,
            services::state::SyncSummary,

            // --- Kits ---
            models::kits::KitContent,
            models::kits::Kit,
            models::kits::KitDraft,
            models::kits::ComposeAction,
            models::kits::KitSaleDraft,
            models::kits::SaleDraftAction,
            models::kits::KitSaleReceipt,

            // --- Sales ---
            models::sales::Sale,
            models::sales::SalesReport,
            models::sales::DailySummary,

            // --- Payloads ---
            handlers::inventory::CreateItemPayload,
            handlers::inventory::RestockPayload,
            handlers::inventory::SetQuantityPayload,
            handlers::inventory::SyncResponse,
            handlers::kits::KitLinePayload,
            handlers::kits::CreateKitPayload,
            handlers::kits::ComposePayload,
            handlers::kits::EditSaleDraftPayload,
            handlers::kits::ConfirmKitSalePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão do operador"),
        (name = "Inventory", description = "Estoque de salgados e bebidas"),
        (name = "Kits", description = "Receitas de kits e venda personalizada"),
        (name = "Sales", description = "Histórico e relatórios de vendas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
