// Public API - what other modules can use
pub use handlers::{
    average_salary_by_department, create_employee, delete_employee, get_employee, list_employees,
    search_by_skill, update_employee,
};
pub use service::EmployeeService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
