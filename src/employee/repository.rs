use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{DepartmentSalaryTotal, EmployeeChanges, EmployeeModel, EmployeeQuery};
use crate::shared::AppError;

const DUPLICATE_EMPLOYEE: &str = "employee_id already exists";
const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

/// Trait for employee store operations
///
/// `insert_employee` must itself reject a duplicate employee_id with
/// `AppError::Conflict`; update and delete report a missing record as
/// `AppError::NotFound`.
#[async_trait]
pub trait EmployeeRepository {
    async fn insert_employee(&self, employee: &EmployeeModel) -> Result<(), AppError>;
    async fn find_by_employee_id(&self, employee_id: &str)
        -> Result<Option<EmployeeModel>, AppError>;
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeModel>, AppError>;
    async fn find_by_skill(&self, skill: &str) -> Result<Vec<EmployeeModel>, AppError>;
    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> Result<(), AppError>;
    async fn delete_employee(&self, employee_id: &str) -> Result<(), AppError>;
    /// Salary sum and head count per department, ordered by department
    async fn salary_totals_by_department(&self) -> Result<Vec<DepartmentSalaryTotal>, AppError>;
}

/// In-memory implementation of EmployeeRepository for development and testing
pub struct InMemoryEmployeeRepository {
    employees: Mutex<HashMap<String, EmployeeModel>>, // keyed by employee_id
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmployeeRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            employees: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated employees
    pub fn with_employees(employees: Vec<EmployeeModel>) -> Self {
        let mut employee_map = HashMap::new();
        for employee in employees {
            employee_map.insert(employee.employee_id.clone(), employee);
        }

        Self {
            employees: Mutex::new(employee_map),
        }
    }

    /// Returns the current number of employees in the repository
    pub fn employee_count(&self) -> usize {
        self.employees.lock().unwrap().len()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    #[instrument(skip(self, employee))]
    async fn insert_employee(&self, employee: &EmployeeModel) -> Result<(), AppError> {
        debug!(employee_id = %employee.employee_id, "Inserting employee in memory");

        let mut employees = self.employees.lock().unwrap();
        if employees.contains_key(&employee.employee_id) {
            warn!(employee_id = %employee.employee_id, "Employee already exists in memory");
            return Err(AppError::Conflict(DUPLICATE_EMPLOYEE.to_string()));
        }
        employees.insert(employee.employee_id.clone(), employee.clone());

        debug!(employee_id = %employee.employee_id, "Employee inserted successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeModel>, AppError> {
        debug!(employee_id = %employee_id, "Fetching employee from memory");

        let employees = self.employees.lock().unwrap();
        Ok(employees.get(employee_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeModel>, AppError> {
        debug!("Listing employees in memory");

        let employees = self.employees.lock().unwrap();
        let mut matching: Vec<EmployeeModel> = employees
            .values()
            .filter(|e| match &query.department {
                Some(department) => &e.department == department,
                None => true,
            })
            .cloned()
            .collect();
        drop(employees);

        matching.sort_by(EmployeeModel::listing_order);

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        let page: Vec<EmployeeModel> = matching.into_iter().skip(skip).take(limit).collect();

        debug!(returned = page.len(), "Employees listed from memory");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn find_by_skill(&self, skill: &str) -> Result<Vec<EmployeeModel>, AppError> {
        debug!(skill = %skill, "Searching employees by skill in memory");

        let employees = self.employees.lock().unwrap();
        let mut matching: Vec<EmployeeModel> = employees
            .values()
            .filter(|e| e.has_skill(skill))
            .cloned()
            .collect();
        drop(employees);

        matching.sort_by(EmployeeModel::listing_order);
        Ok(matching)
    }

    #[instrument(skip(self, changes))]
    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> Result<(), AppError> {
        debug!(employee_id = %employee_id, "Updating employee in memory");

        let mut employees = self.employees.lock().unwrap();
        let employee = employees.get_mut(employee_id).ok_or_else(|| {
            warn!(employee_id = %employee_id, "Employee not found for update in memory");
            AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string())
        })?;
        employee.apply(changes);

        debug!(employee_id = %employee_id, "Employee updated successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, employee_id: &str) -> Result<(), AppError> {
        debug!(employee_id = %employee_id, "Deleting employee from memory");

        let mut employees = self.employees.lock().unwrap();
        if employees.remove(employee_id).is_none() {
            warn!(employee_id = %employee_id, "Employee not found for deletion in memory");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        debug!(employee_id = %employee_id, "Employee deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn salary_totals_by_department(&self) -> Result<Vec<DepartmentSalaryTotal>, AppError> {
        debug!("Aggregating salaries by department in memory");

        let employees = self.employees.lock().unwrap();
        let mut totals: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for employee in employees.values() {
            let entry = totals.entry(employee.department.clone()).or_insert((0, 0));
            entry.0 += i64::from(employee.salary);
            entry.1 += 1;
        }

        Ok(totals
            .into_iter()
            .map(|(department, (total_salary, employee_count))| DepartmentSalaryTotal {
                department,
                total_salary,
                employee_count,
            })
            .collect())
    }
}

/// PostgreSQL implementation of the employee store
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EMPLOYEE_COLUMNS: &str = "id, employee_id, name, department, salary, joining_date, skills";

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    #[instrument(skip(self, employee))]
    async fn insert_employee(&self, employee: &EmployeeModel) -> Result<(), AppError> {
        debug!(employee_id = %employee.employee_id, "Inserting employee in database");

        sqlx::query(
            "INSERT INTO employees (id, employee_id, name, department, salary, joining_date, skills) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&employee.id)
        .bind(&employee.employee_id)
        .bind(&employee.name)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(&employee.joining_date)
        .bind(&employee.skills)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = %employee.employee_id, "Failed to insert employee in database");
            // The unique index is the real guard against concurrent creates
            match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict(DUPLICATE_EMPLOYEE.to_string())
                }
                _ => AppError::DatabaseError(e.to_string()),
            }
        })?;

        debug!(employee_id = %employee.employee_id, "Employee inserted successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeModel>, AppError> {
        debug!(employee_id = %employee_id, "Fetching employee from database");

        sqlx::query_as::<_, EmployeeModel>(&format!(
            "SELECT {} FROM employees WHERE employee_id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = %employee_id, "Failed to fetch employee from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_employees(&self, query: &EmployeeQuery) -> Result<Vec<EmployeeModel>, AppError> {
        debug!("Listing employees from database");

        sqlx::query_as::<_, EmployeeModel>(&format!(
            "SELECT {} FROM employees WHERE ($1::TEXT IS NULL OR department = $1) \
             ORDER BY joining_date DESC, employee_id ASC OFFSET $2 LIMIT $3",
            EMPLOYEE_COLUMNS
        ))
        .bind(query.department.as_deref())
        .bind(to_i64(query.skip))
        .bind(query.limit.map(to_i64))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list employees from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_skill(&self, skill: &str) -> Result<Vec<EmployeeModel>, AppError> {
        debug!(skill = %skill, "Searching employees by skill in database");

        sqlx::query_as::<_, EmployeeModel>(&format!(
            "SELECT {} FROM employees WHERE $1 = ANY(skills) \
             ORDER BY joining_date DESC, employee_id ASC",
            EMPLOYEE_COLUMNS
        ))
        .bind(skill)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, skill = %skill, "Failed to search employees in database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, changes))]
    async fn update_employee(
        &self,
        employee_id: &str,
        changes: &EmployeeChanges,
    ) -> Result<(), AppError> {
        debug!(employee_id = %employee_id, "Updating employee in database");

        let result = sqlx::query(
            "UPDATE employees SET \
               name = COALESCE($2, name), \
               department = COALESCE($3, department), \
               salary = COALESCE($4, salary), \
               joining_date = COALESCE($5, joining_date), \
               skills = COALESCE($6, skills) \
             WHERE employee_id = $1",
        )
        .bind(employee_id)
        .bind(changes.name.as_deref())
        .bind(changes.department.as_deref())
        .bind(changes.salary)
        .bind(changes.joining_date.as_deref())
        .bind(changes.skills.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, employee_id = %employee_id, "Failed to update employee in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(employee_id = %employee_id, "Employee not found for update");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        debug!(employee_id = %employee_id, "Employee updated successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_employee(&self, employee_id: &str) -> Result<(), AppError> {
        debug!(employee_id = %employee_id, "Deleting employee from database");

        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, employee_id = %employee_id, "Failed to delete employee from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            warn!(employee_id = %employee_id, "Employee not found for deletion");
            return Err(AppError::NotFound(EMPLOYEE_NOT_FOUND.to_string()));
        }

        debug!(employee_id = %employee_id, "Employee deleted successfully from database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn salary_totals_by_department(&self) -> Result<Vec<DepartmentSalaryTotal>, AppError> {
        debug!("Aggregating salaries by department in database");

        sqlx::query_as::<_, DepartmentSalaryTotal>(
            "SELECT department, SUM(salary)::BIGINT AS total_salary, COUNT(*) AS employee_count \
             FROM employees \
             WHERE salary IS NOT NULL AND department IS NOT NULL \
             GROUP BY department ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to aggregate salaries in database");
            AppError::DatabaseError(e.to_string())
        })
    }
}
