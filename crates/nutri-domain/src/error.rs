use thiserror::Error;

/// Errores del dominio de nutrición (registros externos y validaciones).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entidad no encontrada: {0}")]
    NotFound(String),

    #[error("Error de validación: {0}")]
    Validation(String),

    #[error("Error del proveedor externo: {0}")]
    Upstream(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Validation(format!("json: {e}"))
    }
}
