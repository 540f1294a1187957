use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use uuid::Uuid;

/// Database model for the employees table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct EmployeeModel {
    pub id: String,          // Internal UUID v4, generated on insert
    pub employee_id: String, // Business key, unique
    pub name: String,
    pub department: String,
    pub salary: i32,
    pub joining_date: String, // YYYY-MM-DD, so lexical order is date order
    pub skills: Vec<String>,
}

impl EmployeeModel {
    /// Creates a new employee model with a generated internal id
    pub fn new(
        employee_id: String,
        name: String,
        department: String,
        salary: i32,
        joining_date: String,
        skills: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id,
            name,
            department,
            salary,
            joining_date,
            skills,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Listing order: newest joiners first, employee_id breaks ties
    pub fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.joining_date
            .cmp(&a.joining_date)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    }

    /// Applies the supplied fields, leaving everything else untouched
    pub fn apply(&mut self, changes: &EmployeeChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(department) = &changes.department {
            self.department = department.clone();
        }
        if let Some(salary) = changes.salary {
            self.salary = salary;
        }
        if let Some(joining_date) = &changes.joining_date {
            self.joining_date = joining_date.clone();
        }
        if let Some(skills) = &changes.skills {
            self.skills = skills.clone();
        }
    }
}

/// Partial update: `None` means "not supplied"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub department: Option<String>,
    pub salary: Option<i32>,
    pub joining_date: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.department.is_none()
            && self.salary.is_none()
            && self.joining_date.is_none()
            && self.skills.is_none()
    }
}

/// Filter and window for listing employees
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeQuery {
    pub department: Option<String>,
    pub skip: u64,
    pub limit: Option<u64>, // None returns every match
}

/// Per-department salary sum and head count, as returned by a store
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct DepartmentSalaryTotal {
    pub department: String,
    pub total_salary: i64,
    pub employee_count: i64,
}

impl DepartmentSalaryTotal {
    /// Mean salary rounded to the nearest integer, ties to even
    pub fn average(&self) -> i64 {
        if self.employee_count <= 0 {
            return 0;
        }

        let total = i128::from(self.total_salary);
        let count = i128::from(self.employee_count);
        let floor = total.div_euclid(count);
        let twice_remainder = 2 * total.rem_euclid(count);

        let rounded = match twice_remainder.cmp(&count) {
            Ordering::Greater => floor + 1,
            Ordering::Equal if floor % 2 != 0 => floor + 1,
            _ => floor,
        };
        rounded as i64
    }
}
