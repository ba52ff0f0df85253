// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{PgStore, Store},
    services::{AuthService, Estoque, InventoryService, KitService, SalesService},
};

// Variáveis lidas do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl_days: i64,
    // Operador criado no primeiro boot, se as duas estiverem definidas
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 5)?,
            session_ttl_days: parse_or("SESSION_TTL_DAYS", 7)?,
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválida: {raw}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub estoque: Estoque,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub kit_service: KitService,
    pub sales_service: SalesService,
}

impl AppState {
    /// Conecta ao banco e monta o gráfico de dependências.
    pub async fn new(config: &Config) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let store: Arc<dyn Store> = Arc::new(PgStore::new(db_pool.clone()));
        let state = Self::with_store(
            store,
            config.jwt_secret.clone(),
            chrono::Duration::days(config.session_ttl_days),
        );
        Ok((state, db_pool))
    }

    pub fn with_store(store: Arc<dyn Store>, jwt_secret: String, session_ttl: chrono::Duration) -> Self {
        let estoque = Estoque::new(store.clone());
        Self {
            auth_service: AuthService::new(store, jwt_secret, session_ttl),
            inventory_service: InventoryService::new(estoque.clone()),
            kit_service: KitService::new(estoque.clone()),
            sales_service: SalesService::new(estoque.clone()),
            estoque,
        }
    }
}
