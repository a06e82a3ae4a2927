// src/common/response.rs

use serde::Serialize;

// Envelope padrão de resposta: `{success, data?}`.
// Os erros produzem `{success: false, error}` via `AppError::into_response`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    // Para operações que não devolvem corpo (update/delete).
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}
