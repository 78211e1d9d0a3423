use crate::{DomainError, FatSecretServing};

/// Colaborador que consulta la API FatSecret.
///
/// La capa de cache sólo depende de este contrato; el cliente HTTP real vive
/// fuera de este workspace. Una implementación debe devolver todas las
/// porciones conocidas del alimento (vector vacío si no tiene ninguna) o
/// `DomainError::NotFound`/`Upstream` ante fallos del proveedor.
pub trait FoodSource: Send + Sync {
    fn fetch_servings(&self, fatsecret_food_id: &str) -> Result<Vec<FatSecretServing>, DomainError>;
}
