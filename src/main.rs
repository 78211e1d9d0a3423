use nutri_persistence::{connect_pool, DbConfig, PoolProvider};
use nutritrack::cli;
use nutritrack::errors::CoreError;

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[nutritrack] {e}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(e.exit_code());
        }
    };

    let result = DbConfig::from_env().and_then(|cfg| connect_pool(&cfg.url, cfg.min_connections, cfg.max_connections))
                                     .map_err(CoreError::from)
                                     .and_then(|pool| cli::run(&command, PoolProvider { pool }));
    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            log::error!("command failed: {e}");
            eprintln!("[nutritrack] error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
