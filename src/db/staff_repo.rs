// src/db/staff_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::staff::{BoardMember, BoardMemberPayload, Employee, EmployeePayload, EmployeePayment},
};

const EMPLOYEE_COLUMNS: &str = "id, masjid_id, name, role, address, phone, photo_url, created_at";
const PAYMENT_COLUMNS: &str =
    "id, masjid_id, employee_id, amount, date, notes, transaction_id, created_at";
const BOARD_COLUMNS: &str = "id, masjid_id, full_name, designation, photo_url, created_at";

// Só executa SQL no executor recebido (conexão RLS da requisição)
#[derive(Clone, Default)]
pub struct StaffRepository;

impl StaffRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub async fn list_employees<'e, E>(&self, executor: E, masjid_id: Uuid) -> Result<Vec<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM employees WHERE masjid_id = $1 ORDER BY name ASC",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Employee>(&sql)
            .bind(masjid_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn create_employee<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        payload: &EmployeePayload,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO employees (masjid_id, name, role, address, phone, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(masjid_id)
            .bind(payload.name.trim())
            .bind(payload.role.trim())
            .bind(payload.address.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.photo_url.as_deref())
            .fetch_one(executor)
            .await?;
        Ok(employee)
    }

    pub async fn find_employee<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM employees WHERE masjid_id = $1 AND id = $2",
            EMPLOYEE_COLUMNS
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(masjid_id)
            .bind(employee_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("employee"))
    }

    pub async fn update_employee<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        employee_id: Uuid,
        payload: &EmployeePayload,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE employees
            SET name = $3, role = $4, address = $5, phone = $6, photo_url = $7
            WHERE masjid_id = $1 AND id = $2
            RETURNING {}
            "#,
            EMPLOYEE_COLUMNS
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(masjid_id)
            .bind(employee_id)
            .bind(payload.name.trim())
            .bind(payload.role.trim())
            .bind(payload.address.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.photo_url.as_deref())
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("employee"))
    }

    pub async fn delete_employee<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        employee_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employees WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(employee_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("employee"));
        }
        Ok(())
    }

    // --- Pagamentos de salário ---

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Vec<EmployeePayment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {} FROM employee_payments
            WHERE masjid_id = $1 AND employee_id = $2
            ORDER BY date DESC, created_at DESC
            "#,
            PAYMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployeePayment>(&sql)
            .bind(masjid_id)
            .bind(employee_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        employee_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        notes: Option<&str>,
        transaction_id: Uuid,
    ) -> Result<EmployeePayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO employee_payments (masjid_id, employee_id, amount, date, notes, transaction_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );
        let payment = sqlx::query_as::<_, EmployeePayment>(&sql)
            .bind(masjid_id)
            .bind(employee_id)
            .bind(amount)
            .bind(date)
            .bind(notes)
            .bind(transaction_id)
            .fetch_one(executor)
            .await?;
        Ok(payment)
    }

    // =========================================================================
    //  DIRETORIA
    // =========================================================================

    pub async fn list_board<'e, E>(&self, executor: E, masjid_id: Uuid) -> Result<Vec<BoardMember>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM board_members WHERE masjid_id = $1 ORDER BY created_at ASC",
            BOARD_COLUMNS
        );
        let rows = sqlx::query_as::<_, BoardMember>(&sql)
            .bind(masjid_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn create_board_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        payload: &BoardMemberPayload,
    ) -> Result<BoardMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO board_members (masjid_id, full_name, designation, photo_url)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOARD_COLUMNS
        );
        let member = sqlx::query_as::<_, BoardMember>(&sql)
            .bind(masjid_id)
            .bind(payload.full_name.trim())
            .bind(payload.designation.trim())
            .bind(payload.photo_url.as_deref())
            .fetch_one(executor)
            .await?;
        Ok(member)
    }

    pub async fn update_board_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        member_id: Uuid,
        payload: &BoardMemberPayload,
    ) -> Result<BoardMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE board_members
            SET full_name = $3, designation = $4, photo_url = $5
            WHERE masjid_id = $1 AND id = $2
            RETURNING {}
            "#,
            BOARD_COLUMNS
        );
        sqlx::query_as::<_, BoardMember>(&sql)
            .bind(masjid_id)
            .bind(member_id)
            .bind(payload.full_name.trim())
            .bind(payload.designation.trim())
            .bind(payload.photo_url.as_deref())
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::NotFound("board_member"))
    }

    pub async fn delete_board_member<'e, E>(
        &self,
        executor: E,
        masjid_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM board_members WHERE masjid_id = $1 AND id = $2")
            .bind(masjid_id)
            .bind(member_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("board_member"));
        }
        Ok(())
    }
}
