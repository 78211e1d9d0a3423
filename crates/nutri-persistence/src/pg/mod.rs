//! Acceso a Postgres (Diesel + r2d2).
//!
//! - `PgPool` / `ConnectionProvider`: obtención de conexiones inyectable.
//! - `inspector`: introspección de `information_schema` (tablas y columnas).
//! - `food_cache`: cache local de porciones FatSecret con ventana de frescura.
//!
//! Todas las operaciones son síncronas; cada una toma una conexión del pool y
//! la devuelve al terminar. No hay reintentos: los errores se propagan
//! mapeados a `PersistenceError`.

pub mod food_cache;
pub mod inspector;

use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Conexión tomada del pool.
pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real (producción/tests de integración) sin
/// acoplar inspector, checker y cache a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Obtiene una conexión lista para ejecutar consultas Diesel, o
    /// `PersistenceError::TransientIo` si el pool no la entrega.
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool.get().map_err(PersistenceError::from)
    }
}

/// Construye un pool r2d2 sin tocar el esquema.
///
/// Valida tamaños: 0 se trata como 1 y si `min_size > max_size` se usa
/// `min_size = max_size`.
pub fn connect_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("pool: min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    debug!("pool:ready min_idle={final_min} max_size={validated_max}");
    Ok(pool)
}

/// Construye un pool y aplica las migraciones pendientes una sola vez.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let pool = connect_pool(database_url, min_size, max_size)?;
    {
        let mut conn = pool.get()?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}
