//! nutri-persistence
//!
//! Capa de datos Postgres (Diesel) del backend de nutrición.
//!
//! Módulos:
//! - `config`: carga de configuración desde .env / entorno.
//! - `error`: `PersistenceError` y mapeo de errores Diesel/r2d2.
//! - `migrations`: runner embebido de migraciones Diesel (latest / rollback).
//! - `schema`: tablas Diesel declaradas para compilar queries.
//! - `pg`: pool, introspección de esquema y cache FatSecret.
//! - `conformance`: manifiesto de tablas esperadas y su verificador.

pub mod config;
pub mod conformance;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use conformance::{ConformanceReport, SchemaConformanceChecker, TableReport, TableSpec, MANIFEST};
pub use error::PersistenceError;
pub use pg::food_cache::{CachedFood, FatSecretCache, NewCachedFood, FATSECRET_CACHE_WINDOW_HOURS};
pub use pg::inspector::{ColumnInfo, SchemaInspector};
pub use pg::{build_pool, connect_pool, ConnectionProvider, PgPool, PoolProvider};
