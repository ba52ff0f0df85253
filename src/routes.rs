// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Tudo abaixo exige sessão ativa
    let session_routes = Router::new()
        .route("/session", get(handlers::auth::get_session))
        .route("/logout", post(handlers::auth::logout));

    let item_routes = Router::new()
        .route(
            "/",
            post(handlers::inventory::create_item).get(handlers::inventory::get_all_items),
        )
        .route("/{id}", delete(handlers::inventory::delete_item))
        .route("/{id}/sell", post(handlers::inventory::sell_item))
        .route("/{id}/restock", post(handlers::inventory::restock_item))
        .route("/{id}/quantity", put(handlers::inventory::set_item_quantity));

    let kit_routes = Router::new()
        .route(
            "/",
            post(handlers::kits::create_kit).get(handlers::kits::get_all_kits),
        )
        .route("/compose", post(handlers::kits::compose_kit))
        .route("/sale", post(handlers::kits::confirm_kit_sale))
        .route("/sale-draft/edit", post(handlers::kits::edit_kit_sale))
        .route("/{id}", delete(handlers::kits::delete_kit))
        .route("/{id}/sale-draft", get(handlers::kits::open_kit_sale));

    let sales_routes = Router::new()
        .route("/", get(handlers::sales::get_sales_report))
        .route("/today", get(handlers::sales::get_today_summary));

    let protected = Router::new()
        .nest("/api/auth", session_routes)
        .route("/api/sync", post(handlers::inventory::sync_data))
        .nest("/api/items", item_routes)
        .nest("/api/kits", kit_routes)
        .nest("/api/sales", sales_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        db::{MemoryStore, Store},
        models::inventory::{Item, ItemCategory, NewItem},
    };

    const EMAIL: &str = "dono@kimania.com";
    const PASSWORD: &str = "salgado123";

    struct TestApp {
        router: Router,
        store: Arc<MemoryStore>,
        coxinha: Item,
        refri: Item,
    }

    async fn app() -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let coxinha = store
            .insert_item(&NewItem {
                name: "Coxinha".into(),
                category: ItemCategory::Fritos,
                quantity: 5,
                min_stock: 10,
                price: Decimal::new(550, 2),
            })
            .await
            .unwrap();
        let refri = store
            .insert_item(&NewItem {
                name: "Refri Lata".into(),
                category: ItemCategory::Bebidas,
                quantity: 1,
                min_stock: 10,
                price: Decimal::new(600, 2),
            })
            .await
            .unwrap();

        let state = AppState::with_store(
            store.clone(),
            "segredo-de-teste".into(),
            chrono::Duration::days(7),
        );
        state.auth_service.ensure_operator(EMAIL, PASSWORD).await.unwrap();

        TestApp { router: build_router(state), store, coxinha, refri }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn login(router: &Router) -> String {
        let (status, body) = send(
            router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": EMAIL, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app().await;
        let (status, _) = send(&app.router, Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = app().await;
        let (status, _) = send(&app.router, Method::GET, "/api/items", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app.router, Method::GET, "/api/items", Some("lixo"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = app().await;
        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": EMAIL, "password": "errada123" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn selling_through_the_api_records_a_sale() {
        let app = app().await;
        let token = login(&app.router).await;

        let (status, items) = send(&app.router, Method::GET, "/api/items", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items.as_array().unwrap().len(), 2);
        assert_eq!(items[0]["name"], "Coxinha");
        assert_eq!(items[0]["lowStock"], true);

        let uri = format!("/api/items/{}/sell", app.coxinha.id);
        let (status, change) = send(&app.router, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(change["item"]["quantity"], 4);
        assert_eq!(change["sale"]["itemName"], "Coxinha");
        assert_eq!(change["stockUpdated"], true);

        let (status, today) =
            send(&app.router, Method::GET, "/api/sales/today", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(today["count"], 1);
        assert_eq!(app.store.sales().len(), 1);
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let app = app().await;
        let token = login(&app.router).await;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/items",
            Some(&token),
            Some(json!({ "name": "Pastel", "price": -1.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.store.item(app.coxinha.id).is_some());
    }

    #[tokio::test]
    async fn kit_sale_without_stock_is_a_conflict() {
        let app = app().await;
        let token = login(&app.router).await;

        let (status, kit) = send(
            &app.router,
            Method::POST,
            "/api/kits",
            Some(&token),
            Some(json!({
                "name": "Combo",
                "contents": [
                    { "itemId": app.coxinha.id, "qty": 2 },
                    { "itemId": app.refri.id, "qty": 2 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/kits/{}/sale-draft", kit["id"].as_str().unwrap());
        let (status, draft) = send(&app.router, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/kits/sale",
            Some(&token),
            Some(json!({ "draft": draft })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(app.store.sales().is_empty());
        assert_eq!(app.store.item(app.coxinha.id).unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn kit_can_be_composed_edited_and_sold_over_http() {
        let app = app().await;
        let token = login(&app.router).await;

        let (status, draft) = send(
            &app.router,
            Method::POST,
            "/api/kits/compose",
            Some(&token),
            Some(json!({
                "draft": { "name": "Combo" },
                "action": { "type": "addLine", "itemId": app.coxinha.id, "qty": 2 }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, draft) = send(
            &app.router,
            Method::POST,
            "/api/kits/compose",
            Some(&token),
            Some(json!({
                "draft": draft,
                "action": { "type": "addLine", "itemId": app.refri.id, "qty": 1 }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["price"], 17.0);
        assert_eq!(draft["contents"][0]["itemName"], "Coxinha");

        let (status, kit) = send(
            &app.router,
            Method::POST,
            "/api/kits",
            Some(&token),
            Some(json!({ "name": draft["name"], "contents": draft["contents"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(kit["price"], 17.0);

        let uri = format!("/api/kits/{}/sale-draft", kit["id"].as_str().unwrap());
        let (_, mut sale_draft) = send(&app.router, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(sale_draft["kitId"], kit["id"]);

        for action in [
            json!({ "type": "adjustLine", "index": 0, "delta": -1 }),
            json!({ "type": "rename", "name": "Combo Festa" }),
            json!({ "type": "overridePrice", "price": 9.9 }),
        ] {
            let (status, edited) = send(
                &app.router,
                Method::POST,
                "/api/kits/sale-draft/edit",
                Some(&token),
                Some(json!({ "draft": sale_draft, "action": action })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            sale_draft = edited;
        }
        assert_eq!(sale_draft["contents"][0]["qty"], 1);

        let (status, receipt) = send(
            &app.router,
            Method::POST,
            "/api/kits/sale",
            Some(&token),
            Some(json!({ "draft": sale_draft })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(receipt["sale"]["itemName"], "KIT: Combo Festa (Venda)");
        assert_eq!(receipt["sale"]["price"], 9.9);
        assert_eq!(receipt["failedComponents"].as_array().unwrap().len(), 0);

        assert_eq!(app.store.item(app.coxinha.id).unwrap().quantity, 4);
        assert_eq!(app.store.item(app.refri.id).unwrap().quantity, 0);
        assert_eq!(app.store.kits()[0].contents[0].qty, 2);
    }

    #[tokio::test]
    async fn logout_invalidates_the_token() {
        let app = app().await;
        let token = login(&app.router).await;

        let (status, session) =
            send(&app.router, Method::GET, "/api/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["email"], EMAIL);

        let (status, _) =
            send(&app.router, Method::POST, "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app.router, Method::GET, "/api/items", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
