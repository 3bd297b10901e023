//! # Employee Repository
//!
//! Employees get `EMP` codes with four-digit padding (`ABCEMP0001`). Salary
//! payments to them live in the records table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::sequence::{generate_code, skip_taken_codes, MAX_CODE_ATTEMPTS};
use sitebook_core::{CurrencyCode, Employee, EntityType, Money, NewEmployee};

const SELECT_COLUMNS: &str = "SELECT id, tenant_id, code, full_name, position, \
     monthly_salary_cents, salary_currency, created_at, updated_at FROM employees";

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: String,
    tenant_id: String,
    code: String,
    full_name: String,
    position: Option<String>,
    monthly_salary_cents: Option<i64>,
    salary_currency: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            tenant_id: row.tenant_id,
            code: row.code,
            full_name: row.full_name,
            position: row.position,
            monthly_salary: row.monthly_salary_cents.map(Money::from_cents),
            salary_currency: CurrencyCode::normalize(row.salary_currency.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for employee operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Registers an employee under a new `EMP` code.
    ///
    /// Same transaction and retry rules as record creation.
    pub async fn create(&self, tenant_id: &str, input: NewEmployee) -> DbResult<Employee> {
        input.validate()?;

        let now = Utc::now();
        let mut employee = Employee {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            code: String::new(),
            full_name: input.full_name.trim().to_string(),
            position: input
                .position
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            monthly_salary: input.monthly_salary_cents.map(Money::from_cents),
            salary_currency: CurrencyCode::normalize(input.salary_currency.as_deref()),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            employee.code = generate_code(&mut tx, tenant_id, EntityType::Employee).await?;

            match insert_row(&mut tx, &employee).await {
                Ok(()) => {
                    tx.commit().await?;
                    info!(tenant_id = %tenant_id, code = %employee.code, "Employee created");
                    return Ok(employee);
                }
                Err(e) if e.is_code_collision() => {
                    skip_taken_codes(&mut tx, tenant_id, EntityType::Employee, &employee.code, attempt)
                        .await?
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::CodeGenerationFailed {
            entity: EntityType::Employee,
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Gets an employee by code.
    pub async fn get_by_code(&self, tenant_id: &str, code: &str) -> DbResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ?1 AND code = ?2"
        ))
        .bind(tenant_id)
        .bind(code.trim().to_ascii_uppercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    /// Lists a tenant's employees by code.
    pub async fn list(&self, tenant_id: &str) -> DbResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{SELECT_COLUMNS} WHERE tenant_id = ?1 ORDER BY code"
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    /// Removes an employee. The code is not reused.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> DbResult<()> {
        debug!(tenant_id = %tenant_id, id = %id, "Deleting employee");

        let result = sqlx::query("DELETE FROM employees WHERE tenant_id = ?1 AND id = ?2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }
}

async fn insert_row(conn: &mut SqliteConnection, employee: &Employee) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO employees (
            id, tenant_id, code, full_name, position,
            monthly_salary_cents, salary_currency, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&employee.id)
    .bind(&employee.tenant_id)
    .bind(&employee.code)
    .bind(&employee.full_name)
    .bind(&employee.position)
    .bind(employee.monthly_salary.map(|m| m.cents()))
    .bind(employee.salary_currency.as_str())
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
