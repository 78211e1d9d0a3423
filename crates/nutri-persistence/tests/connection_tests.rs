//! Pruebas básicas de configuración y pool (requiere DATABASE_URL válido en entorno).

use diesel::connection::SimpleConnection;
use nutri_persistence::{config::DbConfig, connect_pool, ConnectionProvider, PoolProvider};

#[test]
fn create_pool_from_env() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    let cfg = DbConfig::from_env().expect("config");
    let pool = connect_pool(&cfg.url, cfg.min_connections, cfg.max_connections).expect("pool");
    let mut conn = pool.get().expect("conn");
    conn.batch_execute("SELECT 1;").expect("select 1");
}

#[test]
fn min_greater_than_max_is_clamped() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    let cfg = DbConfig::from_env().expect("config");
    let pool = connect_pool(&cfg.url, 4, 1).expect("pool");
    assert_eq!(pool.max_size(), 1);
    let provider = PoolProvider { pool };
    let mut conn = provider.connection().expect("conn");
    conn.batch_execute("SELECT 1;").expect("select 1");
}
