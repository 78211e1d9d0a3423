//! Comandos de la CLI `nutritrack`.
//!
//! `nutritrack migrate`                 aplica migraciones pendientes
//! `nutritrack rollback`                revierte todas las migraciones
//! `nutritrack verify [--no-reset] [--json]`
//!                                      rollback + latest (salvo --no-reset) y
//!                                      verificación del manifiesto
//! `nutritrack truncate`                vacía las tablas del manifiesto
//! `nutritrack foods --id <ID>`         porciones FatSecret frescas en cache

use log::info;
use nutri_persistence::migrations::{revert_all_migrations, run_pending_migrations};
use nutri_persistence::{ConnectionProvider, FatSecretCache, SchemaConformanceChecker};

use crate::errors::CoreError;

pub const USAGE: &str =
    "Uso: nutritrack <migrate | rollback | verify [--no-reset] [--json] | truncate | foods --id <FATSECRET_ID>>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Migrate,
    Rollback,
    Verify { reset: bool, json: bool },
    Truncate,
    Foods { fatsecret_food_id: String },
}

/// Resultado de un comando que terminó sin error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    NotConformant,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Done => 0,
            Outcome::NotConformant => 4,
        }
    }
}

/// Parsea los argumentos (sin el nombre del programa).
pub fn parse_args(args: &[String]) -> Result<Command, CoreError> {
    let Some(cmd) = args.first() else {
        return Err(CoreError::Usage("falta el comando".into()));
    };
    let rest = &args[1..];
    let command = match cmd.as_str() {
        "migrate" => Command::Migrate,
        "rollback" => Command::Rollback,
        "truncate" => Command::Truncate,
        "verify" => {
            let mut reset = true;
            let mut json = false;
            for flag in rest {
                match flag.as_str() {
                    "--no-reset" => reset = false,
                    "--json" => json = true,
                    other => return Err(CoreError::Usage(format!("opción desconocida '{other}' para verify"))),
                }
            }
            return Ok(Command::Verify { reset, json });
        }
        "foods" => {
            let mut id: Option<String> = None;
            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--id" => {
                        i += 1;
                        id = rest.get(i).cloned();
                    }
                    other => return Err(CoreError::Usage(format!("opción desconocida '{other}' para foods"))),
                }
                i += 1;
            }
            return match id.filter(|s| !s.trim().is_empty()) {
                Some(fatsecret_food_id) => Ok(Command::Foods { fatsecret_food_id }),
                None => Err(CoreError::Usage("foods requiere --id <FATSECRET_ID>".into())),
            };
        }
        other => return Err(CoreError::Usage(format!("comando desconocido '{other}'"))),
    };
    if let Some(extra) = rest.first() {
        return Err(CoreError::Usage(format!("argumento inesperado '{extra}'")));
    }
    Ok(command)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|e| CoreError::Internal(format!("json: {e}")))
}

/// Ejecuta un comando contra el proveedor de conexiones dado.
pub fn run<P: ConnectionProvider>(command: &Command, provider: P) -> Result<Outcome, CoreError> {
    info!("cli:run command={command:?}");
    match command {
        Command::Migrate => {
            let mut conn = provider.connection()?;
            let applied = run_pending_migrations(&mut conn)?;
            if applied.is_empty() {
                println!("sin migraciones pendientes");
            }
            for version in applied {
                println!("aplicada {version}");
            }
            Ok(Outcome::Done)
        }
        Command::Rollback => {
            let mut conn = provider.connection()?;
            for version in revert_all_migrations(&mut conn)? {
                println!("revertida {version}");
            }
            Ok(Outcome::Done)
        }
        Command::Verify { reset, json } => {
            let checker = SchemaConformanceChecker::new(provider);
            let report = if *reset { checker.prepare_and_verify()? } else { checker.verify()? };
            if *json {
                println!("{}", to_json(&report)?);
            } else {
                for table in &report.tables {
                    println!("{table}");
                }
            }
            Ok(if report.is_conformant() { Outcome::Done } else { Outcome::NotConformant })
        }
        Command::Truncate => {
            let checker = SchemaConformanceChecker::new(provider);
            checker.truncate_all()?;
            println!("truncadas {} tablas", checker.manifest().len());
            Ok(Outcome::Done)
        }
        Command::Foods { fatsecret_food_id } => {
            let cache = FatSecretCache::new(provider);
            let rows = cache.lookup(fatsecret_food_id)?;
            if rows.is_empty() {
                eprintln!("cache miss: fatsecret_food_id={fatsecret_food_id}");
            }
            println!("{}", to_json(&rows)?);
            Ok(Outcome::Done)
        }
    }
}
