//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! engine's configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::{AppConfig, AuthConfig, PolicyConfig, ServerConfig};

/// Loads and provides access to the application configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml   # Attendance, payroll and currency policy
/// ├── server.yaml   # Bind address, sessions and store backend
/// └── auth.yaml     # Users allowed to log in
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Base currency: {}", loader.config().policy.currency.code);
/// # Ok::<(), hr_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The policy is internally inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let server = Self::load_yaml::<ServerConfig>(&path.join("server.yaml"))?;
        let auth = Self::load_yaml::<AuthConfig>(&path.join("auth.yaml"))?;

        Self::from_config(AppConfig {
            policy,
            server,
            auth,
        })
    }

    /// Wraps an already-built configuration after checking it.
    pub fn from_config(config: AppConfig) -> PayrollResult<Self> {
        Self::check_policy(&config.policy)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn check_policy(policy: &PolicyConfig) -> PayrollResult<()> {
        let invalid = |message: String| PayrollError::ConfigParseError {
            path: "policy".to_string(),
            message,
        };

        if policy.payroll.min_year > policy.payroll.max_year {
            return Err(invalid(format!(
                "payroll.min_year {} is after payroll.max_year {}",
                policy.payroll.min_year, policy.payroll.max_year
            )));
        }

        let attendance = &policy.attendance;
        let amounts = [
            ("late_deduction_per_minute", attendance.late_deduction_per_minute),
            ("absent_deduction_percent", attendance.absent_deduction_percent),
            ("half_day_deduction_percent", attendance.half_day_deduction_percent),
        ];
        if let Some((name, value)) = amounts.iter().find(|(_, v)| v.is_sign_negative()) {
            return Err(invalid(format!("attendance.{} must not be negative, got {}", name, value)));
        }

        if let Some((code, rate)) = policy
            .currency
            .exchange_rates
            .iter()
            .find(|(_, rate)| !rate.is_sign_positive() || rate.is_zero())
        {
            return Err(invalid(format!(
                "currency.exchange_rates.{} must be positive, got {}",
                code, rate
            )));
        }

        let max_amount = policy.currency.max_amount;
        if !max_amount.is_sign_positive() || max_amount.is_zero() {
            return Err(invalid(format!(
                "currency.max_amount must be positive, got {}",
                max_amount
            )));
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}
