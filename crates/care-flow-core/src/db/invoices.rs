//! Invoice database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ChargeSource, Invoice, InvoiceStatus};

const INVOICE_COLUMNS: &str = r#"
    id, patient_id, amount, status, description, source,
    payment_method, created_at, paid_at
"#;

impl Database {
    /// Insert a new invoice.
    pub fn insert_invoice(&self, invoice: &Invoice) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO invoices (
                id, patient_id, amount, status, description, source,
                payment_method, created_at, paid_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                invoice.id,
                invoice.patient_id,
                invoice.amount,
                status_to_string(invoice.status),
                invoice.description,
                source_to_string(invoice.source),
                invoice.payment_method,
                invoice.created_at,
                invoice.paid_at,
            ],
        )?;
        Ok(())
    }

    /// Get an invoice by ID.
    pub fn get_invoice(&self, id: &str) -> DbResult<Option<Invoice>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM invoices WHERE id = ?", INVOICE_COLUMNS),
                [id],
                InvoiceRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all invoices for a patient, oldest first.
    pub fn list_invoices_for_patient(&self, patient_id: &str) -> DbResult<Vec<Invoice>> {
        self.query_invoices(
            &format!(
                "SELECT {} FROM invoices WHERE patient_id = ?1 ORDER BY created_at, rowid",
                INVOICE_COLUMNS
            ),
            params![patient_id],
        )
    }

    /// List a patient's unpaid invoices, oldest first.
    pub fn list_unpaid_invoices_for_patient(&self, patient_id: &str) -> DbResult<Vec<Invoice>> {
        self.query_invoices(
            &format!(
                "SELECT {} FROM invoices WHERE patient_id = ?1 AND status = 'unpaid' ORDER BY created_at, rowid",
                INVOICE_COLUMNS
            ),
            params![patient_id],
        )
    }

    /// List every unpaid invoice (the cashier's worklist).
    pub fn list_unpaid_invoices(&self) -> DbResult<Vec<Invoice>> {
        self.query_invoices(
            &format!(
                "SELECT {} FROM invoices WHERE status = 'unpaid' ORDER BY created_at, rowid",
                INVOICE_COLUMNS
            ),
            params![],
        )
    }

    /// Sum of a patient's unpaid invoices.
    pub fn outstanding_balance(&self, patient_id: &str) -> DbResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM invoices WHERE patient_id = ? AND status = 'unpaid'",
            [patient_id],
            |row| row.get(0),
        )?)
    }

    /// Mark an invoice paid, only if it is still unpaid.
    ///
    /// Returns `false` when the invoice does not exist or was already paid.
    pub fn mark_invoice_paid(
        &self,
        id: &str,
        payment_method: Option<&str>,
        paid_at: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE invoices SET
                status = 'paid',
                payment_method = COALESCE(?2, payment_method),
                paid_at = ?3
            WHERE id = ?1 AND status = 'unpaid'
            "#,
            params![id, payment_method, paid_at],
        )?;
        Ok(rows_affected > 0)
    }

    fn query_invoices(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> DbResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, InvoiceRow::from_row)?;

        let mut invoices = Vec::new();
        for row in rows {
            invoices.push(row?.try_into()?);
        }
        Ok(invoices)
    }
}

/// Intermediate row struct for database mapping.
struct InvoiceRow {
    id: String,
    patient_id: String,
    amount: i64,
    status: String,
    description: String,
    source: String,
    payment_method: Option<String>,
    created_at: String,
    paid_at: Option<String>,
}

impl InvoiceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            amount: row.get(2)?,
            status: row.get(3)?,
            description: row.get(4)?,
            source: row.get(5)?,
            payment_method: row.get(6)?,
            created_at: row.get(7)?,
            paid_at: row.get(8)?,
        })
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DbError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            status: string_to_status(&row.status)?,
            source: string_to_source(&row.source)?,
            id: row.id,
            patient_id: row.patient_id,
            amount: row.amount,
            description: row.description,
            payment_method: row.payment_method,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}

fn status_to_string(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Unpaid => "unpaid",
        InvoiceStatus::Paid => "paid",
    }
}

fn string_to_status(s: &str) -> Result<InvoiceStatus, DbError> {
    match s {
        "unpaid" => Ok(InvoiceStatus::Unpaid),
        "paid" => Ok(InvoiceStatus::Paid),
        _ => Err(DbError::Constraint(format!("Unknown invoice status: {}", s))),
    }
}

fn source_to_string(source: ChargeSource) -> &'static str {
    match source {
        ChargeSource::LabTest => "lab_test",
        ChargeSource::Dispensing => "dispensing",
        ChargeSource::Consultation => "consultation",
        ChargeSource::Manual => "manual",
    }
}

fn string_to_source(s: &str) -> Result<ChargeSource, DbError> {
    match s {
        "lab_test" => Ok(ChargeSource::LabTest),
        "dispensing" => Ok(ChargeSource::Dispensing),
        "consultation" => Ok(ChargeSource::Consultation),
        "manual" => Ok(ChargeSource::Manual),
        _ => Err(DbError::Constraint(format!("Unknown charge source: {}", s))),
    }
}
