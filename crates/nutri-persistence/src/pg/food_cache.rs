//! Cache local de la API FatSecret (tabla `foods`).
//!
//! FatSecret permite cachear sus respuestas hasta 24 h. Aquí se considera
//! fresca una fila cuyo `retrieved_at` es estrictamente posterior a
//! `now - 22h`, dejando margen antes de que el propio proveedor la invalide.
//!
//! La tabla es append-only: `insert` no deduplica ni hace upsert, así que
//! insertar dos veces la misma porción deja dos filas y `lookup` devuelve
//! ambas mientras estén dentro de la ventana. Tampoco hay transacción entre
//! la lectura y la inserción de `servings_or_fetch`; dos misses concurrentes
//! para el mismo id insertan dos veces.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use log::{debug, info};
use nutri_domain::{FatSecretServing, FoodSource};
use serde::Serialize;

use super::ConnectionProvider;
use crate::error::PersistenceError;
use crate::schema::foods;

pub const FATSECRET_CACHE_WINDOW_HOURS: i64 = 22;

/// Ventana de frescura por defecto (22 h).
pub fn default_window() -> Duration {
    Duration::hours(FATSECRET_CACHE_WINDOW_HOURS)
}

/// Instante a partir del cual (exclusivo) una fila sigue fresca.
pub fn cache_cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now - window
}

pub fn is_fresh(retrieved_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    retrieved_at > cache_cutoff(now, window)
}

/// Fila de `foods` leída o devuelta por `INSERT ... RETURNING`.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = foods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CachedFood {
    pub id: i32,
    pub fatsecret_food_id: String,
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_id: Option<String>,
    pub serving_description: Option<String>,
    pub metric_serving_amount: Option<f32>,
    pub metric_serving_unit: Option<String>,
    pub calories: Option<f32>,
    pub fat_g: Option<f32>,
    pub protein_g: Option<f32>,
    pub carbs_g: Option<f32>,
    pub sugar_g: Option<f32>,
    pub fiber_g: Option<f32>,
    pub sodium_mg: Option<f32>,
    pub retrieved_at: DateTime<Utc>,
}

/// Fila a insertar; `retrieved_at` lo fija quien trajo los datos del
/// proveedor.
#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = foods)]
pub struct NewCachedFood {
    pub fatsecret_food_id: String,
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_id: Option<String>,
    pub serving_description: Option<String>,
    pub metric_serving_amount: Option<f32>,
    pub metric_serving_unit: Option<String>,
    pub calories: Option<f32>,
    pub fat_g: Option<f32>,
    pub protein_g: Option<f32>,
    pub carbs_g: Option<f32>,
    pub sugar_g: Option<f32>,
    pub fiber_g: Option<f32>,
    pub sodium_mg: Option<f32>,
    pub retrieved_at: DateTime<Utc>,
}

impl NewCachedFood {
    /// Mapea una porción FatSecret a fila de cache (gramos y sodio en mg,
    /// mismas unidades que el proveedor).
    pub fn from_serving(serving: &FatSecretServing, retrieved_at: DateTime<Utc>) -> Self {
        Self { fatsecret_food_id: serving.food_id.clone(),
               food_name: serving.food_name.clone(),
               brand_name: serving.brand_name.clone(),
               serving_id: serving.serving_id.clone(),
               serving_description: serving.serving_description.clone(),
               metric_serving_amount: serving.metric_serving_amount,
               metric_serving_unit: serving.metric_serving_unit.clone(),
               calories: serving.calories,
               fat_g: serving.fat,
               protein_g: serving.protein,
               carbs_g: serving.carbohydrate,
               sugar_g: serving.sugar,
               fiber_g: serving.fiber,
               sodium_mg: serving.sodium,
               retrieved_at }
    }
}

/// Cache de porciones FatSecret sobre la tabla `foods`.
pub struct FatSecretCache<P: ConnectionProvider> {
    provider: P,
    window: Duration,
}

impl<P: ConnectionProvider> FatSecretCache<P> {
    /// Cache con la ventana estándar de 22 h.
    pub fn new(provider: P) -> Self {
        Self::with_window(provider, default_window())
    }

    pub fn with_window(provider: P, window: Duration) -> Self {
        Self { provider, window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Filas frescas para `fatsecret_food_id` (más recientes primero). Vacío
    /// significa miss: el llamador debe consultar FatSecret e `insert`ar.
    pub fn lookup(&self, fatsecret_food_id: &str) -> Result<Vec<CachedFood>, PersistenceError> {
        self.lookup_at(fatsecret_food_id, Utc::now())
    }

    pub fn lookup_at(&self, fatsecret_food_id: &str, now: DateTime<Utc>) -> Result<Vec<CachedFood>, PersistenceError> {
        let cutoff = cache_cutoff(now, self.window);
        debug!("lookup:start fatsecret_food_id={fatsecret_food_id} cutoff={cutoff}");
        let mut conn = self.provider.connection()?;
        let rows = foods::table.filter(foods::fatsecret_food_id.eq(fatsecret_food_id))
                               .filter(foods::retrieved_at.gt(cutoff))
                               .order((foods::retrieved_at.desc(), foods::id.desc()))
                               .select(CachedFood::as_select())
                               .load(&mut conn)?;
        debug!("lookup:done fatsecret_food_id={fatsecret_food_id} count={}", rows.len());
        Ok(rows)
    }

    /// Inserta todas las filas en un único `INSERT` y las devuelve con su
    /// `id` generado. Sin filas no se toca la base.
    pub fn insert(&self, rows: &[NewCachedFood]) -> Result<Vec<CachedFood>, PersistenceError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        debug!("insert:start count={}", rows.len());
        let mut conn = self.provider.connection()?;
        let inserted = diesel::insert_into(foods::table).values(rows)
                                                        .returning(CachedFood::as_returning())
                                                        .get_results(&mut conn)?;
        debug!("insert:done count={}", inserted.len());
        Ok(inserted)
    }

    /// Lectura con relleno: devuelve el cache si está fresco; si no, consulta
    /// `source`, sella todas las porciones con el mismo `retrieved_at` y las
    /// inserta bajo el id solicitado.
    pub fn servings_or_fetch(&self, fatsecret_food_id: &str, source: &dyn FoodSource) -> Result<Vec<CachedFood>, PersistenceError> {
        let cached = self.lookup(fatsecret_food_id)?;
        if !cached.is_empty() {
            debug!("servings_or_fetch:hit fatsecret_food_id={fatsecret_food_id}");
            return Ok(cached);
        }
        info!("servings_or_fetch:miss fatsecret_food_id={fatsecret_food_id} -> fetching upstream");
        let servings = source.fetch_servings(fatsecret_food_id)?;
        let retrieved_at = Utc::now();
        let rows: Vec<NewCachedFood> =
            servings.iter()
                    .map(|s| NewCachedFood { fatsecret_food_id: fatsecret_food_id.to_string(),
                                             ..NewCachedFood::from_serving(s, retrieved_at) })
                    .collect();
        self.insert(&rows)
    }
}
