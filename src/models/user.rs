use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person in the campus directory.
///
/// Inactive users keep their records but are refused at scan time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nombre: String,
    pub correo: String,
    pub matricula: String,
    pub carrera: String,
    pub grupo: String,
    pub activo: bool,
    #[serde(default)]
    pub imagen: Option<String>,
}

/// User as returned by the lookup endpoints: the directory row plus the
/// best-effort resolved credential photo URL.
#[derive(Clone, Debug, Serialize)]
pub struct UsuarioView {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen_url: Option<String>,
}

impl UsuarioView {
    pub fn resolve(user: &User, public_base_url: Option<&str>) -> Self {
        let imagen_url =
            crate::utils::storage::resolve_image_url(public_base_url, user.imagen.as_deref());
        Self {
            user: user.clone(),
            imagen_url,
        }
    }
}
