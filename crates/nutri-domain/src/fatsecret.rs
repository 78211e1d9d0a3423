//! Registro de porción FatSecret y parser de respuestas `food.get`.
//!
//! FatSecret serializa los valores numéricos como strings (`"231"`,
//! `"5.04"`) y devuelve `servings.serving` como objeto cuando el alimento
//! tiene una sola porción y como arreglo cuando tiene varias. Ambas formas se
//! aceptan. Los nutrientes usan las unidades de FatSecret: gramos salvo
//! `sodium`, que viene en miligramos.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainError;

/// Porción de un alimento tal como la entrega la API externa (ya normalizada).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatSecretServing {
    pub food_id: String,
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_id: Option<String>,
    pub serving_description: Option<String>,
    pub metric_serving_amount: Option<f32>,
    pub metric_serving_unit: Option<String>,
    pub calories: Option<f32>,
    pub fat: Option<f32>,
    pub protein: Option<f32>,
    pub carbohydrate: Option<f32>,
    pub sugar: Option<f32>,
    pub fiber: Option<f32>,
    pub sodium: Option<f32>,
}

#[derive(Deserialize)]
struct FoodGetResponse {
    food: RawFood,
}

#[derive(Deserialize)]
struct RawFood {
    food_id: Value,
    food_name: String,
    #[serde(default)]
    brand_name: Option<String>,
    #[serde(default)]
    servings: Option<RawServings>,
}

#[derive(Deserialize)]
struct RawServings {
    serving: OneOrMany<RawServing>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    // `Many` primero: un struct derivado también acepta secuencias posicionales.
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(t) => vec![t],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawServing {
    serving_id: Option<Value>,
    serving_description: Option<String>,
    metric_serving_amount: Option<Value>,
    metric_serving_unit: Option<String>,
    calories: Option<Value>,
    fat: Option<Value>,
    protein: Option<Value>,
    carbohydrate: Option<Value>,
    sugar: Option<Value>,
    fiber: Option<Value>,
    sodium: Option<Value>,
}

/// Convierte un identificador (string o número JSON) a string opaco.
fn opaque_id(field: &str, v: &Value) -> Result<String, DomainError> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DomainError::Validation(format!("{field}: identificador inválido {other}"))),
    }
}

/// Decimal FatSecret: acepta `"5.04"`, `5.04` o ausencia (`None`). Un string
/// vacío cuenta como ausente.
fn decimal(field: &str, v: Option<&Value>) -> Result<Option<f32>, DomainError> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64()
                                   .map(|f| Some(f as f32))
                                   .ok_or_else(|| DomainError::Validation(format!("{field}: número fuera de rango"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim()
                                   .parse::<f32>()
                                   .map(Some)
                                   .map_err(|_| DomainError::Validation(format!("{field}: valor no numérico '{s}'"))),
        Some(other) => Err(DomainError::Validation(format!("{field}: tipo inesperado {other}"))),
    }
}

impl RawServing {
    fn into_serving(self, food_id: &str, food_name: &str, brand_name: Option<&String>) -> Result<FatSecretServing, DomainError> {
        let serving_id = match &self.serving_id {
            Some(v) => Some(opaque_id("serving_id", v)?),
            None => None,
        };
        Ok(FatSecretServing { food_id: food_id.to_string(),
                              food_name: food_name.to_string(),
                              brand_name: brand_name.cloned(),
                              serving_id,
                              serving_description: self.serving_description,
                              metric_serving_amount: decimal("metric_serving_amount", self.metric_serving_amount.as_ref())?,
                              metric_serving_unit: self.metric_serving_unit,
                              calories: decimal("calories", self.calories.as_ref())?,
                              fat: decimal("fat", self.fat.as_ref())?,
                              protein: decimal("protein", self.protein.as_ref())?,
                              carbohydrate: decimal("carbohydrate", self.carbohydrate.as_ref())?,
                              sugar: decimal("sugar", self.sugar.as_ref())?,
                              fiber: decimal("fiber", self.fiber.as_ref())?,
                              sodium: decimal("sodium", self.sodium.as_ref())? })
    }
}

/// Parsea una respuesta `food.get` y devuelve una porción por cada
/// `servings.serving`. Un alimento sin porciones devuelve vector vacío.
pub fn parse_food_get(json: &str) -> Result<Vec<FatSecretServing>, DomainError> {
    let response: FoodGetResponse = serde_json::from_str(json)?;
    let food = response.food;
    let food_id = opaque_id("food_id", &food.food_id)?;
    let servings = match food.servings {
        Some(s) => s.serving.into_vec(),
        None => return Ok(vec![]),
    };
    servings.into_iter()
            .map(|raw| raw.into_serving(&food_id, &food.food_name, food.brand_name.as_ref()))
            .collect()
}
