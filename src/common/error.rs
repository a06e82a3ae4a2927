// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Tudo que atravessa a fronteira dos services vira uma variante daqui;
// nenhum erro cru do sqlx vaza para o cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação feita pelo processador (fronteira de confiança), nomeando o campo.
    #[error("Campo '{field}' inválido: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Item não encontrado")]
    ItemNotFound,

    #[error("Transação não encontrada")]
    TransactionNotFound,

    #[error("Lançamento de custo não encontrado")]
    CostItemNotFound,

    // Carrega o saldo disponível para o cliente poder corrigir a quantidade.
    #[error("Estoque insuficiente (disponível: {available})")]
    InsufficientStock { available: i32 },

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Código de convite inválido ou já utilizado")]
    InvalidInviteCode,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    Forbidden,

    // O insert do registro e o ajuste de saldo divergiram dentro da transação.
    // O rollback já aconteceu quando isso chega ao cliente; é seguro tentar de novo.
    #[error("Falha de consistência entre razão e estoque")]
    Consistency,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
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
            // Retorna todos os detalhes da validação, campo a campo.
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
                    "success": false,
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::InvalidField { field, message } => {
                let body = Json(json!({
                    "success": false,
                    "error": message,
                    "field": field,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::InsufficientStock { available } => {
                let body = Json(json!({
                    "success": false,
                    "error": format!("Estoque insuficiente. Disponível: {}.", available),
                    "available": available,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::ItemNotFound => (StatusCode::NOT_FOUND, "Item não encontrado."),
            AppError::TransactionNotFound => (StatusCode::NOT_FOUND, "Transação não encontrada."),
            AppError::CostItemNotFound => {
                (StatusCode::NOT_FOUND, "Lançamento de custo não encontrado.")
            }
            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Este nome de usuário já está em uso.")
            }
            AppError::InvalidInviteCode => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Código de convite inválido ou já utilizado.",
            ),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Acesso negado."),
            AppError::Consistency => {
                tracing::error!("Falha de consistência entre razão e estoque (rollback aplicado)");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Falha transitória ao registrar a movimentação. Tente novamente.",
                )
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
