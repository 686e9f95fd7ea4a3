use serde::{Deserialize, Serialize};

use crate::models::code::Code;
use crate::models::user::UsuarioView;

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detalles: Option<String>,
}

/// Body of `GET /buscar-qr/{codigo}`.
///
/// `existe: false` with `usado: true` means the code is known but spent;
/// plain `existe: false` means the code is unknown.
#[derive(Serialize)]
pub struct QrLookupResponse {
    pub existe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usado: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr: Option<Code>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UsuarioView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

impl QrLookupResponse {
    pub fn unknown() -> Self {
        Self {
            existe: false,
            usado: None,
            qr: None,
            usuario: None,
            mensaje: Some("Código QR no encontrado".to_string()),
        }
    }

    pub fn already_used() -> Self {
        Self {
            existe: false,
            usado: Some(true),
            qr: None,
            usuario: None,
            mensaje: Some("Este código QR ya fue utilizado y no es válido".to_string()),
        }
    }

    pub fn found(qr: Code, usuario: UsuarioView) -> Self {
        Self {
            existe: true,
            usado: None,
            qr: Some(qr),
            usuario: Some(usuario),
            mensaje: None,
        }
    }
}

/// Body of the user lookup endpoints.
#[derive(Serialize)]
pub struct UsuarioLookupResponse {
    pub existe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<UsuarioView>,
}

#[derive(Serialize)]
pub struct UsuariosResponse {
    pub mensaje: String,
    pub usuarios: Vec<UsuarioView>,
}
