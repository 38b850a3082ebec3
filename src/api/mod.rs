//! HTTP API module for the HR payroll engine.
//!
//! This module provides the REST API endpoints for managing employees,
//! recording attendance and generating payroll.

mod handlers;
mod middleware;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, EmployeeRequest, ListQuery, LoginRequest, PayrollRequest, StatusRequest,
};
pub use response::{ApiError, ApiErrorResponse, LoginResponse};
pub use state::AppState;
