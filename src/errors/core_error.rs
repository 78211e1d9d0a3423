use nutri_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Uso incorrecto: {0}")]
    Usage(String),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CoreError {
    /// Código de salida de la CLI: 2 uso, 5 error de ejecución.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Usage(_) => 2,
            _ => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_variant_format() {
        let err = CoreError::Internal("algo malo".into());
        assert_eq!(err.to_string(), "Error interno: algo malo");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_usage_variant_format() {
        let err = CoreError::Usage("comando desconocido 'x'".into());
        assert_eq!(err.to_string(), "Uso incorrecto: comando desconocido 'x'");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_persistence_variant_from() {
        let err: CoreError = PersistenceError::Config("DATABASE_URL no definido".into()).into();
        assert_eq!(err.to_string(),
                   "Error de persistencia: configuration error: DATABASE_URL no definido");
    }
}
