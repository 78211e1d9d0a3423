//! Introspección del esquema vivo vía `information_schema`, limitada al
//! esquema actual (`current_schema()`).

use diesel::prelude::*;
use diesel::sql_types::{Bool, Int4, Nullable, Text};
use log::debug;
use serde::Serialize;

use super::ConnectionProvider;
use crate::error::PersistenceError;

const HAS_TABLE_SQL: &str = "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
                             WHERE table_schema = current_schema() AND table_name = $1) AS present";

const HAS_COLUMN_SQL: &str = "SELECT EXISTS (SELECT 1 FROM information_schema.columns \
                              WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2) AS present";

const COLUMN_INFO_SQL: &str = "SELECT column_name::text AS name, \
                                      data_type::text AS data_type, \
                                      character_maximum_length::int4 AS max_length, \
                                      (is_nullable = 'YES') AS nullable, \
                                      column_default::text AS default_value \
                               FROM information_schema.columns \
                               WHERE table_schema = current_schema() AND table_name = $1 \
                               ORDER BY ordinal_position";

#[derive(QueryableByName)]
struct Presence {
    #[diesel(sql_type = Bool)]
    present: bool,
}

/// Descripción de una columna tal como la reporta Postgres.
#[derive(QueryableByName, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Text)]
    pub data_type: String,
    #[diesel(sql_type = Nullable<Int4>)]
    pub max_length: Option<i32>,
    #[diesel(sql_type = Bool)]
    pub nullable: bool,
    #[diesel(sql_type = Nullable<Text>)]
    pub default_value: Option<String>,
}

/// Consultas de existencia de tablas/columnas sobre un `ConnectionProvider`.
pub struct SchemaInspector<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SchemaInspector<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn has_table(&self, table: &str) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let row: Presence = diesel::sql_query(HAS_TABLE_SQL).bind::<Text, _>(table)
                                                            .get_result(&mut conn)?;
        debug!("has_table table={table} present={}", row.present);
        Ok(row.present)
    }

    pub fn has_column(&self, table: &str, column: &str) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let row: Presence = diesel::sql_query(HAS_COLUMN_SQL).bind::<Text, _>(table)
                                                             .bind::<Text, _>(column)
                                                             .get_result(&mut conn)?;
        Ok(row.present)
    }

    /// Columnas de `table` en orden de definición. Tabla inexistente → vacío.
    pub fn column_info(&self, table: &str) -> Result<Vec<ColumnInfo>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let cols: Vec<ColumnInfo> = diesel::sql_query(COLUMN_INFO_SQL).bind::<Text, _>(table)
                                                                      .load(&mut conn)?;
        debug!("column_info table={table} count={}", cols.len());
        Ok(cols)
    }

    pub fn column_count(&self, table: &str) -> Result<usize, PersistenceError> {
        Ok(self.column_info(table)?.len())
    }
}
