//! HTTP request handlers for the HR payroll API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints.

use axum::{
    Extension, Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Session;
use crate::error::PayrollError;
use crate::models::{AttendanceId, EmployeeId, PayrollId};

use super::middleware::require_session;
use super::request::{
    AttendanceRequest, EmployeeRequest, ListQuery, LoginRequest, PayrollRequest, StatusRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceList, EmployeeList, LoginResponse, PayrollList,
    StatusMessage,
};
use super::state::AppState;

type ApiResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
///
/// Everything except `/health` and `/login` requires a bearer token.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/logout", post(logout_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler).delete(delete_employee_handler),
        )
        .route(
            "/attendance",
            get(list_attendance_handler).post(record_attendance_handler),
        )
        .route(
            "/attendance/:id",
            get(get_attendance_handler).delete(delete_attendance_handler),
        )
        .route(
            "/payroll",
            get(list_payroll_handler).post(generate_payroll_handler),
        )
        .route(
            "/payroll/preview/:employee_id/:year/:month",
            get(preview_payroll_handler),
        )
        .route(
            "/payroll/:id",
            get(get_payroll_handler).delete(delete_payroll_handler),
        )
        .route("/payroll/:id/status", put(update_payroll_status_handler))
        .route("/admin/clear", post(clear_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .merge(protected)
        .with_state(state)
}

/// Unwraps a JSON body, turning rejections into error responses.
fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected request body"
        );
        ApiErrorResponse::bad_request(ApiError::from_json_rejection(&rejection))
    })
}

fn path_params<T>(
    params: Result<Path<T>, PathRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    params.map(|Path(params)| params).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected path parameters"
        );
        ApiErrorResponse::bad_request(ApiError::new("VALIDATION_ERROR", rejection.body_text()))
    })
}

fn query_params<T>(
    query: Result<Query<T>, QueryRejection>,
    correlation_id: Uuid,
) -> Result<T, ApiErrorResponse> {
    query.map(|Query(query)| query).map_err(|rejection| {
        warn!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected query string"
        );
        ApiErrorResponse::bad_request(ApiError::new("VALIDATION_ERROR", rejection.body_text()))
    })
}

/// Logs a failed operation and converts it into an error response.
fn failed(correlation_id: Uuid, operation: &str, err: PayrollError) -> ApiErrorResponse {
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %err,
        "Request failed"
    );
    err.into()
}

/// Handler for GET /health.
async fn health_handler() -> Json<StatusMessage> {
    Json(StatusMessage::new("ok"))
}

/// Handler for POST /login.
///
/// Verifies the credentials and opens a session.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let request = json_body(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, username = %request.username, "Login attempt");

    let session = state
        .authenticate(request.into())
        .await
        .and_then(|username| state.sessions().issue(&username))
        .map_err(|err| failed(correlation_id, "login", err))?;

    info!(
        correlation_id = %correlation_id,
        username = %session.username,
        "Session opened"
    );
    Ok(Json(LoginResponse::from(session)).into_response())
}

/// Handler for POST /logout.
async fn logout_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    state
        .sessions()
        .revoke(session.token)
        .map_err(|err| failed(correlation_id, "logout", err))?;

    info!(correlation_id = %correlation_id, username = %session.username, "Session closed");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /employees.
async fn list_employees_handler(State(state): State<AppState>) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let employees = state
        .with_service(|service| service.list_employees())
        .await
        .map_err(|err| failed(correlation_id, "list_employees", err))?;

    Ok(Json(EmployeeList { employees }).into_response())
}

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing employee creation");
    let request = json_body(payload, correlation_id)?;

    let employee = state
        .with_service(move |service| service.create_employee(request.into()))
        .await
        .map_err(|err| failed(correlation_id, "create_employee", err))?;

    info!(
        correlation_id = %correlation_id,
        employee_id = employee.id,
        "Employee creation completed"
    );
    Ok((StatusCode::CREATED, Json(employee)).into_response())
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<EmployeeId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;

    let employee = state
        .with_service(move |service| service.get_employee(id))
        .await
        .map_err(|err| failed(correlation_id, "get_employee", err))?;

    Ok(Json(employee).into_response())
}

/// Handler for DELETE /employees/:id.
///
/// Removes the employee's attendance and payroll as well.
async fn delete_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<EmployeeId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;
    info!(correlation_id = %correlation_id, employee_id = id, "Processing employee deletion");

    let summary = state
        .with_service(move |service| service.delete_employee(id))
        .await
        .map_err(|err| failed(correlation_id, "delete_employee", err))?;

    Ok(Json(summary).into_response())
}

/// Handler for GET /attendance.
async fn list_attendance_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let query = query_params(query, correlation_id)?;

    let filter = query
        .attendance_filter()
        .map_err(|err| failed(correlation_id, "list_attendance", err))?;
    let attendances = state
        .with_service(move |service| service.attendance_entries(&filter))
        .await
        .map_err(|err| failed(correlation_id, "list_attendance", err))?;

    Ok(Json(AttendanceList { attendances }).into_response())
}

/// Handler for POST /attendance.
async fn record_attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance record");
    let request = json_body(payload, correlation_id)?;

    let attendance = state
        .with_service(move |service| service.record_attendance(request.into()))
        .await
        .map_err(|err| failed(correlation_id, "record_attendance", err))?;

    info!(
        correlation_id = %correlation_id,
        attendance_id = attendance.id,
        employee_id = attendance.employee_id,
        "Attendance record completed"
    );
    Ok((StatusCode::CREATED, Json(attendance)).into_response())
}

/// Handler for GET /attendance/:id.
async fn get_attendance_handler(
    State(state): State<AppState>,
    id: Result<Path<AttendanceId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;

    let attendance = state
        .with_service(move |service| service.get_attendance(id))
        .await
        .map_err(|err| failed(correlation_id, "get_attendance", err))?;

    Ok(Json(attendance).into_response())
}

/// Handler for DELETE /attendance/:id.
async fn delete_attendance_handler(
    State(state): State<AppState>,
    id: Result<Path<AttendanceId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;

    state
        .with_service(move |service| service.delete_attendance(id))
        .await
        .map_err(|err| failed(correlation_id, "delete_attendance", err))?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for GET /payroll/preview/:employee_id/:year/:month.
///
/// Computes the payroll figures without storing anything.
async fn preview_payroll_handler(
    State(state): State<AppState>,
    params: Result<Path<(EmployeeId, i32, u32)>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let (employee_id, year, month) = path_params(params, correlation_id)?;

    let preview = state
        .with_service(move |service| {
            service.calculate_payroll_preview(employee_id, year, month)
        })
        .await
        .map_err(|err| failed(correlation_id, "preview_payroll", err))?;

    Ok(Json(preview).into_response())
}

/// Handler for GET /payroll.
async fn list_payroll_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let query = query_params(query, correlation_id)?;

    let filter = query.payroll_filter();
    let payroll = state
        .with_service(move |service| service.payroll_entries(&filter))
        .await
        .map_err(|err| failed(correlation_id, "list_payroll", err))?;

    Ok(Json(PayrollList { payroll }).into_response())
}

/// Handler for POST /payroll.
///
/// Generates and stores the payroll for one employee and month.
async fn generate_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll generation");
    let request = json_body(payload, correlation_id)?;

    let payroll = state
        .with_service(move |service| service.generate_payroll(request.into()))
        .await
        .map_err(|err| failed(correlation_id, "generate_payroll", err))?;

    info!(
        correlation_id = %correlation_id,
        payroll_id = payroll.id,
        employee_id = payroll.employee_id,
        net_salary = %payroll.net_salary,
        "Payroll generation completed"
    );
    Ok((StatusCode::CREATED, Json(payroll)).into_response())
}

/// Handler for GET /payroll/:id.
async fn get_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<PayrollId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;

    let payroll = state
        .with_service(move |service| service.get_payroll(id))
        .await
        .map_err(|err| failed(correlation_id, "get_payroll", err))?;

    Ok(Json(payroll).into_response())
}

/// Handler for DELETE /payroll/:id.
async fn delete_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<PayrollId>, PathRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;
    info!(correlation_id = %correlation_id, payroll_id = id, "Processing payroll deletion");

    state
        .with_service(move |service| service.delete_payroll(id))
        .await
        .map_err(|err| failed(correlation_id, "delete_payroll", err))?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for PUT /payroll/:id/status.
async fn update_payroll_status_handler(
    State(state): State<AppState>,
    id: Result<Path<PayrollId>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    let id = path_params(id, correlation_id)?;
    let request = json_body(payload, correlation_id)?;

    let payroll = state
        .with_service(move |service| service.update_payroll_status(id, request.status))
        .await
        .map_err(|err| failed(correlation_id, "update_payroll_status", err))?;

    Ok(Json(payroll).into_response())
}

/// Handler for POST /admin/clear.
async fn clear_handler(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, username = %session.username, "Clearing all data");

    state
        .with_service(|service| service.clear_all_data())
        .await
        .map_err(|err| failed(correlation_id, "clear_all_data", err))?;

    Ok(Json(StatusMessage::new("cleared")).into_response())
}
