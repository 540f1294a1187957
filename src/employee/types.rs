use serde::{Deserialize, Serialize};

use super::models::{EmployeeChanges, EmployeeModel};
use crate::shared::AppError;
use crate::validation::{validate_joining_date, Validate};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;

/// Request payload for creating an employee
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub salary: i32,
    pub joining_date: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Validate for CreateEmployeeRequest {
    fn validate(&self) -> Result<(), AppError> {
        validate_joining_date(&self.joining_date)
    }
}

impl From<CreateEmployeeRequest> for EmployeeModel {
    fn from(request: CreateEmployeeRequest) -> Self {
        EmployeeModel::new(
            request.employee_id,
            request.name,
            request.department,
            request.salary,
            request.joining_date,
            request.skills,
        )
    }
}

/// Request payload for a partial update
///
/// Absent fields and explicit `null` both mean "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<i32>,
    pub joining_date: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl Validate for UpdateEmployeeRequest {
    fn validate(&self) -> Result<(), AppError> {
        match &self.joining_date {
            Some(date) => validate_joining_date(date),
            None => Ok(()),
        }
    }
}

impl From<UpdateEmployeeRequest> for EmployeeChanges {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            name: request.name,
            department: request.department,
            salary: request.salary,
            joining_date: request.joining_date,
            skills: request.skills,
        }
    }
}

/// Query string for GET /employees
#[derive(Debug, Clone, Deserialize)]
pub struct ListEmployeesParams {
    pub department: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListEmployeesParams {
    fn default() -> Self {
        Self {
            department: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Query string for GET /employees/search
#[derive(Debug, Clone, Deserialize)]
pub struct SkillSearchParams {
    pub skill: String,
}

/// Employee as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeResponse {
    pub id: String,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub salary: i32,
    pub joining_date: String,
    pub skills: Vec<String>,
}

impl From<EmployeeModel> for EmployeeResponse {
    fn from(model: EmployeeModel) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            name: model.name,
            department: model.department,
            salary: model.salary,
            joining_date: model.joining_date,
            skills: model.skills,
        }
    }
}

/// One row of the salary report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentAverageSalary {
    pub department: String,
    pub avg_salary: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AverageSalaryReport {
    pub data: Vec<DepartmentAverageSalary>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
