//! nutri-domain
//!
//! Tipos de dominio compartidos por la capa de persistencia y la CLI:
//! - `error`: errores de dominio.
//! - `fatsecret`: registro de porción devuelto por la API FatSecret y su
//!   parser de respuestas `food.get`.
//! - `source`: trait del colaborador que consulta la API externa.

pub mod error;
pub mod fatsecret;
pub mod source;

pub use error::DomainError;
pub use fatsecret::{parse_food_get, FatSecretServing};
pub use source::FoodSource;
