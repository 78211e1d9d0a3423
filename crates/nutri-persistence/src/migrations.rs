//! Runner de las migraciones embebidas (`migrations/` de este crate).
//!
//! Una migración Diesel por tabla; revertir todas deja el esquema vacío
//! (salvo la tabla de control `__diesel_schema_migrations`).

use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{error, info};

use crate::error::PersistenceError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

fn migration_error(op: &str, e: impl std::fmt::Display) -> PersistenceError {
    error!("migrations:{op} failed err={e}");
    PersistenceError::Migration(format!("{op}: {e}"))
}

/// Aplica todas las migraciones pendientes (equivalente a "latest").
/// Devuelve las versiones aplicadas en esta llamada, en orden.
pub fn run_pending_migrations(conn: &mut PgConnection) -> Result<Vec<String>, PersistenceError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| migration_error("latest", e))?;
    let versions: Vec<String> = applied.iter().map(|v| v.to_string()).collect();
    if !versions.is_empty() {
        info!("migrations:latest applied={}", versions.len());
    }
    Ok(versions)
}

/// Revierte todas las migraciones aplicadas, de la más reciente a la más
/// antigua. Devuelve las versiones revertidas.
pub fn revert_all_migrations(conn: &mut PgConnection) -> Result<Vec<String>, PersistenceError> {
    let reverted = conn.revert_all_migrations(MIGRATIONS)
                       .map_err(|e| migration_error("rollback", e))?;
    let versions: Vec<String> = reverted.iter().map(|v| v.to_string()).collect();
    info!("migrations:rollback reverted={}", versions.len());
    Ok(versions)
}

/// Versiones actualmente registradas como aplicadas.
pub fn applied_migrations(conn: &mut PgConnection) -> Result<Vec<String>, PersistenceError> {
    let applied = conn.applied_migrations()
                      .map_err(|e| migration_error("status", e))?;
    Ok(applied.iter().map(|v| v.to_string()).collect())
}
