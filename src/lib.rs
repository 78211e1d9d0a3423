//! nutritrack
//!
//! Crate raíz del backend de nutrición:
//! - `errors`: errores de la aplicación (`CoreError`) y códigos de salida.
//! - `cli`: parseo y ejecución de los comandos del binario `nutritrack`
//!   (migraciones, verificación de esquema, truncado y consulta del cache
//!   FatSecret).
//!
//! La lógica de datos vive en `nutri-persistence`; los tipos de FatSecret en
//! `nutri-domain`.

pub mod cli;
pub mod errors;
