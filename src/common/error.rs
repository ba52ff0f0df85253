// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Erro único da aplicação, com `thiserror` para as conversões automáticas.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Item não encontrado: {0}")]
    ItemNotFound(Uuid),

    #[error("Kit não encontrado: {0}")]
    KitNotFound(Uuid),

    #[error("Linha {0} não existe no kit")]
    LineNotFound(usize),

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i32),

    #[error("Preço inválido: {0}")]
    InvalidPrice(Decimal),

    #[error("Adicione itens ao kit.")]
    EmptyKit,

    // Mensagem exibida para o operador na conferência do kit
    #[error("Faltam: {0}")]
    InsufficientStock(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` guarda o contexto de qualquer falha inesperada.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Dados incorretos.".to_string()),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),
            ref e @ (AppError::ItemNotFound(_) | AppError::KitNotFound(_) | AppError::LineNotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ref e @ (AppError::InvalidQuantity(_) | AppError::InvalidPrice(_) | AppError::EmptyKit) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ref e @ AppError::InsufficientStock(_) => (StatusCode::CONFLICT, e.to_string()),

            // Todo o resto (banco, bcrypt, jwt, interno) vira 500.
            // O detalhe vai só para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
