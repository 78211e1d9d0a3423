//! Verificación de conformidad del esquema contra un manifiesto declarativo.
//!
//! El manifiesto es una lista de `(tabla, columnas esperadas)`. Para cada
//! entrada se comprueba, en orden:
//! 1. que la tabla exista;
//! 2. que el número de columnas sea exactamente el esperado (detecta columnas
//!    sobrantes, no sólo faltantes);
//! 3. que cada columna esperada exista.
//!
//! No se verifican tipos, nulabilidad, defaults, índices ni claves foráneas.
//!
//! `prepare` revierte todas las migraciones y las vuelve a aplicar. Si falla,
//! el error se registra y se devuelve: `prepare_and_verify` no ejecuta ningún
//! chequeo sobre un esquema a medio construir.

use std::fmt;

use diesel::RunQueryDsl;
use log::{debug, error, info};
use serde::Serialize;

use crate::error::PersistenceError;
use crate::migrations::{revert_all_migrations, run_pending_migrations};
use crate::pg::inspector::SchemaInspector;
use crate::pg::ConnectionProvider;

/// Tabla esperada y sus columnas, en orden de definición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Tablas que deben existir tras aplicar todas las migraciones.
pub const MANIFEST: &[TableSpec] = &[
    TableSpec { name: "users",
                columns: &["id", "username", "password", "email", "height_cm", "sex", "dob"] },
    TableSpec { name: "food_and_beverages",
                columns: &["id",
                           "name",
                           "human_unit",
                           "human_quantity",
                           "standard_unit",
                           "standard_quantity",
                           "calories",
                           "fat_g",
                           "protein_g",
                           "carbs_g",
                           "sugar_g",
                           "fiber_g",
                           "sodium_mg"] },
    TableSpec { name: "consumption_log",
                columns: &["id",
                           "user_id",
                           "food_bev_id",
                           "time_consumed_at",
                           "human_quantity",
                           "standard_quantity",
                           "unit_type"] },
    TableSpec { name: "recipes",
                columns: &["id",
                           "name",
                           "description",
                           "prep_time_min",
                           "cook_time_min",
                           "servings",
                           "standard_quantity",
                           "serving_description"] },
    TableSpec { name: "recipe_instructions",
                columns: &["id", "recipe_id", "step_number", "step_description"] },
    TableSpec { name: "recipe_ingredients",
                columns: &["id",
                           "recipe_id",
                           "food_bev_id",
                           "order",
                           "human_quantity",
                           "standard_quantity",
                           "unit_type"] },
    TableSpec { name: "recipes_consumption",
                columns: &["id", "user_id", "recipe_id", "time_consumed_at", "recipe_proportion"] },
    TableSpec { name: "user_budget_data",
                columns: &["id",
                           "user_id",
                           "start_date",
                           "goal_weekly_weight_change_lb",
                           "activity_level",
                           "caloric_budget"] },
    TableSpec { name: "user_metric_history",
                columns: &["id", "user_id", "observation_time", "weight_kg"] },
    TableSpec { name: "foods",
                columns: &["id",
                           "fatsecret_food_id",
                           "food_name",
                           "brand_name",
                           "serving_id",
                           "serving_description",
                           "metric_serving_amount",
                           "metric_serving_unit",
                           "calories",
                           "fat_g",
                           "protein_g",
                           "carbs_g",
                           "sugar_g",
                           "fiber_g",
                           "sodium_mg",
                           "retrieved_at"] },
];

/// Resultado de verificar una tabla del manifiesto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: String,
    pub exists: bool,
    pub expected_columns: usize,
    pub actual_columns: usize,
    pub missing_columns: Vec<String>,
    pub unexpected_columns: Vec<String>,
}

impl TableReport {
    /// Reporte de una tabla ausente: todas las columnas esperadas faltan.
    fn missing_table(spec: &TableSpec) -> Self {
        Self { table: spec.name.to_string(),
               exists: false,
               expected_columns: spec.columns.len(),
               actual_columns: 0,
               missing_columns: spec.columns.iter().map(|c| c.to_string()).collect(),
               unexpected_columns: vec![] }
    }

    pub fn is_conformant(&self) -> bool {
        self.exists && self.actual_columns == self.expected_columns && self.missing_columns.is_empty()
    }
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conformant() {
            return write!(f, "{}: ok ({} columns)", self.table, self.actual_columns);
        }
        if !self.exists {
            return write!(f, "{}: FAIL table not found", self.table);
        }
        write!(f,
               "{}: FAIL columns expected={} actual={}",
               self.table, self.expected_columns, self.actual_columns)?;
        if !self.missing_columns.is_empty() {
            write!(f, " missing=[{}]", self.missing_columns.join(", "))?;
        }
        if !self.unexpected_columns.is_empty() {
            write!(f, " unexpected=[{}]", self.unexpected_columns.join(", "))?;
        }
        Ok(())
    }
}

/// Resultado agregado de todo el manifiesto, en el orden del manifiesto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    pub tables: Vec<TableReport>,
}

impl ConformanceReport {
    pub fn is_conformant(&self) -> bool {
        self.tables.iter().all(TableReport::is_conformant)
    }

    pub fn failures(&self) -> impl Iterator<Item = &TableReport> {
        self.tables.iter().filter(|t| !t.is_conformant())
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `TRUNCATE TABLE "a", "b" CASCADE` para todas las tablas dadas, o `None`
/// si la lista está vacía. CASCADE evita tener que ordenar por claves
/// foráneas.
pub fn truncate_statement(tables: &[&str]) -> Option<String> {
    if tables.is_empty() {
        return None;
    }
    let list = tables.iter().map(|t| quote_ident(t)).collect::<Vec<_>>().join(", ");
    Some(format!("TRUNCATE TABLE {list} CASCADE"))
}

/// Verificador de conformidad sobre un `ConnectionProvider`.
pub struct SchemaConformanceChecker<P: ConnectionProvider> {
    inspector: SchemaInspector<P>,
    manifest: Vec<TableSpec>,
}

impl<P: ConnectionProvider> SchemaConformanceChecker<P> {
    /// Checker sobre el manifiesto completo (`MANIFEST`).
    pub fn new(provider: P) -> Self {
        Self::with_manifest(provider, MANIFEST)
    }

    pub fn with_manifest(provider: P, manifest: &[TableSpec]) -> Self {
        Self { inspector: SchemaInspector::new(provider),
               manifest: manifest.to_vec() }
    }

    pub fn manifest(&self) -> &[TableSpec] {
        &self.manifest
    }

    pub fn inspector(&self) -> &SchemaInspector<P> {
        &self.inspector
    }

    /// Parte de cero: revierte todas las migraciones y aplica hasta la última.
    pub fn prepare(&self) -> Result<(), PersistenceError> {
        let mut conn = self.inspector.provider().connection()?;
        let result = revert_all_migrations(&mut conn).and_then(|_| run_pending_migrations(&mut conn));
        match result {
            Ok(applied) => {
                info!("conformance:prepare applied={}", applied.len());
                Ok(())
            }
            Err(e) => {
                error!("conformance:prepare aborted, schema checks will not run: {e}");
                Err(e)
            }
        }
    }

    pub fn check_table(&self, spec: &TableSpec) -> Result<TableReport, PersistenceError> {
        if !self.inspector.has_table(spec.name)? {
            debug!("check_table table={} exists=false", spec.name);
            return Ok(TableReport::missing_table(spec));
        }
        let info = self.inspector.column_info(spec.name)?;
        let mut missing_columns = Vec::new();
        for column in spec.columns {
            if !self.inspector.has_column(spec.name, column)? {
                missing_columns.push(column.to_string());
            }
        }
        let unexpected_columns = info.iter()
                                     .filter(|c| !spec.columns.contains(&c.name.as_str()))
                                     .map(|c| c.name.clone())
                                     .collect();
        Ok(TableReport { table: spec.name.to_string(),
                         exists: true,
                         expected_columns: spec.columns.len(),
                         actual_columns: info.len(),
                         missing_columns,
                         unexpected_columns })
    }

    /// Verifica todo el manifiesto sobre el esquema actual, sin migrar.
    pub fn verify(&self) -> Result<ConformanceReport, PersistenceError> {
        let tables = self.manifest
                         .iter()
                         .map(|spec| self.check_table(spec))
                         .collect::<Result<Vec<_>, _>>()?;
        let report = ConformanceReport { tables };
        info!("conformance:verify tables={} failures={}",
              report.tables.len(),
              report.failures().count());
        Ok(report)
    }

    pub fn prepare_and_verify(&self) -> Result<ConformanceReport, PersistenceError> {
        self.prepare()?;
        self.verify()
    }

    /// Vacía las filas (no el esquema) de todas las tablas del manifiesto con
    /// una sola sentencia.
    pub fn truncate_all(&self) -> Result<(), PersistenceError> {
        let names: Vec<&str> = self.manifest.iter().map(|t| t.name).collect();
        let Some(stmt) = truncate_statement(&names) else {
            return Ok(());
        };
        debug!("truncate_all: {stmt}");
        let mut conn = self.inspector.provider().connection()?;
        diesel::sql_query(stmt).execute(&mut conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn manifest_lists_every_table_once() {
        let names: HashSet<&str> = MANIFEST.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), MANIFEST.len());
        assert_eq!(MANIFEST.len(), 10);
    }

    #[test]
    fn manifest_columns_are_unique_and_start_with_id() {
        for spec in MANIFEST {
            let cols: HashSet<&str> = spec.columns.iter().copied().collect();
            assert_eq!(cols.len(), spec.columns.len(), "columnas duplicadas en {}", spec.name);
            assert_eq!(spec.columns.first(), Some(&"id"), "{} debe empezar por id", spec.name);
        }
    }

    #[test]
    fn users_has_seven_columns() {
        let users = MANIFEST.iter().find(|t| t.name == "users").unwrap();
        assert_eq!(users.columns.len(), 7);
        assert!(users.columns.contains(&"dob"));
    }

    #[test]
    fn truncate_statement_quotes_and_cascades() {
        assert_eq!(truncate_statement(&["users", "recipe_ingredients"]).as_deref(),
                   Some("TRUNCATE TABLE \"users\", \"recipe_ingredients\" CASCADE"));
        assert_eq!(truncate_statement(&["weird\"name"]).as_deref(),
                   Some("TRUNCATE TABLE \"weird\"\"name\" CASCADE"));
    }

    #[test]
    fn truncate_statement_empty_is_none() {
        assert_eq!(truncate_statement(&[]), None);
    }

    #[test]
    fn missing_table_report_lists_all_columns() {
        let spec = TableSpec { name: "ghost", columns: &["id", "name"] };
        let report = TableReport::missing_table(&spec);
        assert!(!report.is_conformant());
        assert_eq!(report.missing_columns, vec!["id", "name"]);
        assert_eq!(report.to_string(), "ghost: FAIL table not found");
    }

    #[test]
    fn extra_column_breaks_conformance() {
        let report = TableReport { table: "users".into(),
                                   exists: true,
                                   expected_columns: 7,
                                   actual_columns: 8,
                                   missing_columns: vec![],
                                   unexpected_columns: vec!["nickname".into()] };
        assert!(!report.is_conformant());
        assert_eq!(report.to_string(),
                   "users: FAIL columns expected=7 actual=8 unexpected=[nickname]");
        let all = ConformanceReport { tables: vec![report] };
        assert!(!all.is_conformant());
        assert_eq!(all.failures().count(), 1);
        assert!(all.table("users").is_some());
    }
}
