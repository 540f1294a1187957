use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::EmployeeService,
    types::{
        AverageSalaryReport, CreateEmployeeRequest, EmployeeResponse, ListEmployeesParams,
        MessageResponse, SkillSearchParams, UpdateEmployeeRequest,
    },
};
use crate::shared::{AppError, AppState};
use crate::validation::ValidatedJson;

fn employee_service(state: &AppState) -> EmployeeService {
    EmployeeService::new(Arc::clone(&state.employee_repository))
}

/// HTTP handler for creating an employee
///
/// POST /employees
#[instrument(name = "create_employee", skip(state, request))]
pub async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AppError> {
    info!(employee_id = %request.employee_id, "Creating employee");

    let employee = employee_service(&state).create_employee(request).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// HTTP handler for listing employees
///
/// GET /employees?department=&page=&size=
#[instrument(name = "list_employees", skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<ListEmployeesParams>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let employees = employee_service(&state).list_employees(params).await?;
    Ok(Json(employees))
}

/// GET /employees/avg-salary
#[instrument(name = "average_salary_by_department", skip(state))]
pub async fn average_salary_by_department(
    State(state): State<AppState>,
) -> Result<Json<AverageSalaryReport>, AppError> {
    let data = employee_service(&state)
        .average_salary_by_department()
        .await?;
    Ok(Json(AverageSalaryReport { data }))
}

/// GET /employees/search?skill=
#[instrument(name = "search_by_skill", skip(state))]
pub async fn search_by_skill(
    State(state): State<AppState>,
    Query(params): Query<SkillSearchParams>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let employees = employee_service(&state)
        .search_by_skill(&params.skill)
        .await?;
    Ok(Json(employees))
}

/// GET /employees/{employee_id}
#[instrument(name = "get_employee", skip(state))]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let employee = employee_service(&state).get_employee(&employee_id).await?;
    Ok(Json(employee))
}

/// PUT /employees/{employee_id}
#[instrument(name = "update_employee", skip(state, request))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    employee_service(&state)
        .update_employee(&employee_id, request)
        .await?;
    Ok(Json(MessageResponse::new("Employee updated")))
}

/// DELETE /employees/{employee_id}
#[instrument(name = "delete_employee", skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    employee_service(&state).delete_employee(&employee_id).await?;
    Ok(Json(MessageResponse::new("Employee deleted")))
}
