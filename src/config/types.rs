//! Configuration types for the HR payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every policy struct has
//! a [`Default`] carrying the standard company policy.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Period;

/// Attendance penalty policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendancePolicy {
    /// The time the working day starts; lateness is measured from here.
    pub expected_start_time: NaiveTime,
    /// Minutes past the start time that still count as on time.
    pub late_threshold_minutes: u32,
    /// Deduction per late minute, in the base currency.
    pub late_deduction_per_minute: Decimal,
    /// Percentage of the daily rate deducted per absence.
    pub absent_deduction_percent: Decimal,
    /// Percentage of the daily rate deducted per half-day.
    pub half_day_deduction_percent: Decimal,
    /// Whether attendance may be recorded for dates after today.
    pub allow_future_dates: bool,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            expected_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            late_threshold_minutes: 15,
            late_deduction_per_minute: Decimal::new(10, 0),
            absent_deduction_percent: Decimal::new(5, 0),
            half_day_deduction_percent: Decimal::new(25, 1),
            allow_future_dates: false,
        }
    }
}

impl AttendancePolicy {
    /// Returns true if an arrival this many minutes past the start is late.
    pub fn is_late(&self, late_minutes: u32) -> bool {
        late_minutes > self.late_threshold_minutes
    }
}

/// What happens when a payroll is generated for a period that already
/// has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationPolicy {
    /// Keep earlier records and insert another.
    #[default]
    KeepHistory,
    /// Remove earlier records for the period and insert the new one.
    Replace,
}

/// Payroll generation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollPolicy {
    /// Earliest accepted payroll year.
    pub min_year: i32,
    /// Latest accepted payroll year.
    pub max_year: i32,
    /// Behavior when regenerating a period.
    pub regeneration: RegenerationPolicy,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_year: 2100,
            regeneration: RegenerationPolicy::KeepHistory,
        }
    }
}

impl PayrollPolicy {
    /// Builds a period, rejecting months outside 1-12 and years outside
    /// `[min_year, max_year]`.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_payroll::config::PayrollPolicy;
    ///
    /// let policy = PayrollPolicy::default();
    /// assert!(policy.period(2025, 6).is_ok());
    /// assert!(policy.period(2025, 13).is_err());
    /// assert!(policy.period(1999, 6).is_err());
    /// ```
    pub fn period(&self, year: i32, month: u32) -> PayrollResult<Period> {
        if year < self.min_year || year > self.max_year {
            return Err(PayrollError::InvalidPeriod {
                message: format!(
                    "year {} is outside {}-{}",
                    year, self.min_year, self.max_year
                ),
            });
        }
        Period::new(year, month)
    }
}

/// Base currency and conversion rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// ISO code of the currency every stored amount is in.
    pub code: String,
    /// Minor-unit precision amounts are rounded to.
    pub decimal_places: u32,
    /// Units of the base currency per one unit of the keyed currency.
    pub exchange_rates: HashMap<String, Decimal>,
    /// Largest salary, deduction or allowance accepted, in the base
    /// currency.
    pub max_amount: Decimal,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            code: "INR".to_string(),
            decimal_places: 2,
            exchange_rates: HashMap::new(),
            max_amount: Decimal::new(1_000_000_000_000, 0),
        }
    }
}

/// Business policy loaded from `policy.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Attendance penalty policy.
    pub attendance: AttendancePolicy,
    /// Payroll generation policy.
    pub payroll: PayrollPolicy,
    /// Currency settings.
    pub currency: CurrencyConfig,
}

/// Which record store backs the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// A JSON file on local disk.
    JsonFile {
        /// Path of the data file.
        path: PathBuf,
    },
}

/// Server settings loaded from `server.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_address: String,
    /// Lifetime of a login session.
    pub session_ttl_minutes: i64,
    /// Record store selection.
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            session_ttl_minutes: 480,
            store: StoreConfig::Memory,
        }
    }
}

/// A user allowed to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    /// Login name.
    pub username: String,
    /// Argon2 PHC string of the password.
    pub password_hash: String,
}

/// Users loaded from `auth.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Users allowed to log in.
    pub users: Vec<UserCredential>,
}

/// The complete configuration loaded from a config directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Business policy.
    pub policy: PolicyConfig,
    /// Server settings.
    pub server: ServerConfig,
    /// Login users.
    pub auth: AuthConfig,
}
