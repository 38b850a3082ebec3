//! Error types for the HR payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the record store, the calculators and the service
//! boundary can report.

use thiserror::Error;

/// The main error type for the HR payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hr_payroll::error::PayrollError;
///
/// let error = PayrollError::NotFound {
///     entity: "employee".to_string(),
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "employee 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A field was missing, malformed or out of range.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record (e.g. "employee").
        entity: String,
        /// The id that was looked up.
        id: u64,
    },

    /// A child record referenced an employee that does not exist.
    #[error("Cannot create {entity}: employee {employee_id} does not exist")]
    ReferentialIntegrity {
        /// The kind of child record being created.
        entity: String,
        /// The missing employee id.
        employee_id: u64,
    },

    /// A month, year or date was outside the accepted range.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// A description of the range violation.
        message: String,
    },

    /// A numeric argument was negative or out of range.
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument {
        /// The offending argument.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// The record would duplicate an existing one.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting record.
        message: String,
    },

    /// The backing store failed to read or write.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// The supplied credentials were rejected.
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// The request carried no valid session.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why the session was rejected.
        message: String,
    },
}

impl PayrollError {
    /// Shorthand for a [`PayrollError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PayrollError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PayrollError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: u64) -> Self {
        PayrollError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// An [`PayrollError::InvalidArgument`] for an amount whose arithmetic
    /// would leave the decimal range.
    pub fn overflow(field: impl Into<String>) -> Self {
        PayrollError::InvalidArgument {
            field: field.into(),
            message: "amount is too large to calculate with".to_string(),
        }
    }

    /// Shorthand for a [`PayrollError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        PayrollError::Storage {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
