//! Configuration loading and management for the HR payroll engine.
//!
//! This module loads the attendance, payroll and currency policy, the
//! server settings and the login users from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use hr_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap().into_config();
//! println!("Listening on {}", config.server.bind_address);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, AttendancePolicy, AuthConfig, CurrencyConfig, PayrollPolicy, PolicyConfig,
    RegenerationPolicy, ServerConfig, StoreConfig, UserCredential,
};
