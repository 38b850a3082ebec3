//! `hr-payroll` binary: serves the HTTP API and runs admin tasks against
//! the configured store.

use std::env;
use std::error::Error;
use std::process;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hr_payroll::api::{AppState, create_router};
use hr_payroll::auth::hash_password;
use hr_payroll::config::{AppConfig, ConfigLoader, StoreConfig};
use hr_payroll::error::PayrollResult;
use hr_payroll::service::PayrollService;
use hr_payroll::store::open_store;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

const USAGE: &str = "usage: hr-payroll [serve | hash-password <password> | dump | clear-data]

  serve                     serve the HTTP API (default)
  hash-password <password>  print an argon2 hash for auth.yaml
  dump                      print every table of the store as JSON
  clear-data                delete every record in the store

The config directory is read from HR_PAYROLL_CONFIG (default ./config/default).";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["serve"] => serve().await,
        ["hash-password", password] => {
            println!("{}", hash_password(password)?);
            Ok(())
        }
        ["dump"] => {
            let snapshot = open_service()?.snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        ["clear-data"] => {
            open_service()?.clear_all_data()?;
            info!("Store cleared");
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }
}

fn load_config() -> PayrollResult<AppConfig> {
    let dir = env::var("HR_PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    info!(config_dir = %dir, "Loading configuration");
    Ok(ConfigLoader::load(&dir)?.into_config())
}

fn open_service() -> PayrollResult<PayrollService> {
    let config = load_config()?;
    if matches!(config.server.store, StoreConfig::Memory) {
        warn!("The configured store is in memory; it holds no records outside a running server");
    }
    let store = open_store(&config.server.store)?;
    Ok(PayrollService::new(store, config.policy))
}

async fn serve() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    let bind_address = config.server.bind_address.clone();
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "HR payroll API listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
