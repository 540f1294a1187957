use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{EmployeeChanges, EmployeeModel, EmployeeQuery},
    repository::EmployeeRepository,
    types::{
        CreateEmployeeRequest, DepartmentAverageSalary, EmployeeResponse, ListEmployeesParams,
        UpdateEmployeeRequest,
    },
};
use crate::shared::AppError;

/// Service for handling employee business logic
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository + Send + Sync>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates an employee; a taken employee_id is a Conflict
    #[instrument(skip(self, request), fields(employee_id = %request.employee_id))]
    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> Result<EmployeeResponse, AppError> {
        // Fast path for a friendly error; the store re-checks atomically on insert
        if self
            .repository
            .find_by_employee_id(&request.employee_id)
            .await?
            .is_some()
        {
            warn!("employee_id already exists");
            return Err(AppError::Conflict("employee_id already exists".to_string()));
        }

        let employee = EmployeeModel::from(request);
        self.repository.insert_employee(&employee).await?;

        info!(id = %employee.id, "Employee created successfully");
        Ok(EmployeeResponse::from(employee))
    }

    #[instrument(skip(self))]
    pub async fn get_employee(&self, employee_id: &str) -> Result<EmployeeResponse, AppError> {
        self.repository
            .find_by_employee_id(employee_id)
            .await?
            .map(EmployeeResponse::from)
            .ok_or_else(|| {
                debug!(employee_id = %employee_id, "Employee not found");
                AppError::NotFound("Employee not found".to_string())
            })
    }

    /// Lists employees newest-joiner first, one page at a time
    ///
    /// Page and size are taken as given; page 0 behaves like page 1 and
    /// size 0 lifts the limit.
    #[instrument(skip(self))]
    pub async fn list_employees(
        &self,
        params: ListEmployeesParams,
    ) -> Result<Vec<EmployeeResponse>, AppError> {
        let query = EmployeeQuery {
            department: params.department.filter(|d| !d.is_empty()),
            skip: params.page.saturating_sub(1).saturating_mul(params.size),
            limit: (params.size > 0).then_some(params.size),
        };

        let employees = self.repository.list_employees(&query).await?;

        info!(employee_count = employees.len(), "Employees listed successfully");
        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    /// Applies a partial update; an update with no fields is rejected
    #[instrument(skip(self, request))]
    pub async fn update_employee(
        &self,
        employee_id: &str,
        request: UpdateEmployeeRequest,
    ) -> Result<(), AppError> {
        let changes = EmployeeChanges::from(request);
        if changes.is_empty() {
            warn!(employee_id = %employee_id, "Update request carried no fields");
            return Err(AppError::BadRequest(
                "No fields provided for update".to_string(),
            ));
        }

        self.repository.update_employee(employee_id, &changes).await?;

        info!(employee_id = %employee_id, "Employee updated successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, employee_id: &str) -> Result<(), AppError> {
        self.repository.delete_employee(employee_id).await?;

        info!(employee_id = %employee_id, "Employee deleted successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn search_by_skill(&self, skill: &str) -> Result<Vec<EmployeeResponse>, AppError> {
        let employees = self.repository.find_by_skill(skill).await?;

        info!(employee_count = employees.len(), "Skill search completed");
        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    /// Mean salary per department, rounded to the nearest integer
    #[instrument(skip(self))]
    pub async fn average_salary_by_department(
        &self,
    ) -> Result<Vec<DepartmentAverageSalary>, AppError> {
        let totals = self.repository.salary_totals_by_department().await?;

        Ok(totals
            .into_iter()
            .filter(|t| t.employee_count > 0)
            .map(|t| DepartmentAverageSalary {
                avg_salary: t.average(),
                department: t.department,
            })
            .collect())
    }
}
