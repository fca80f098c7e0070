//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Department, Patient};

const PATIENT_COLUMNS: &str = r#"
    id, full_name, age, gender, phone_number, address, nida_number,
    current_department, department_since, created_at, updated_at
"#;

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, full_name, age, gender, phone_number, address, nida_number,
                current_department, department_since, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                patient.id,
                patient.full_name,
                patient.age,
                patient.gender,
                patient.phone_number,
                patient.address,
                patient.nida_number,
                patient.current_department.as_str(),
                patient.department_since,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [id],
                PatientRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List patients currently in a department, earliest arrival first.
    pub fn list_patients_in_department(&self, department: Department) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM patients
            WHERE current_department = ?
            ORDER BY department_since, created_at
            "#,
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map([department.as_str()], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Count patients per department (departments with no patients are omitted).
    pub fn count_patients_by_department(&self) -> DbResult<Vec<(Department, usize)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT current_department, COUNT(*)
            FROM patients
            GROUP BY current_department
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            let (name, count) = row?;
            counts.push((parse_department(&name)?, count as usize));
        }
        Ok(counts)
    }

    /// Search patients by name (prefix match). `%` and `_` in the query match
    /// themselves.
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", escape_like(query));
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM patients
            WHERE full_name LIKE ? ESCAPE '\'
            ORDER BY full_name
            LIMIT ?
            "#,
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }

    /// Move a patient between departments, only if they are still in `from`.
    ///
    /// Returns `false` when the patient does not exist or has already moved.
    pub fn update_patient_department(
        &self,
        id: &str,
        from: Department,
        to: Department,
        at: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                current_department = ?3,
                department_since = ?4,
                updated_at = ?4
            WHERE id = ?1 AND current_department = ?2
            "#,
            params![id, from.as_str(), to.as_str(), at],
        )?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    full_name: String,
    age: Option<u32>,
    gender: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    nida_number: Option<String>,
    current_department: String,
    department_since: String,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            full_name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            phone_number: row.get(4)?,
            address: row.get(5)?,
            nida_number: row.get(6)?,
            current_department: row.get(7)?,
            department_since: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            current_department: parse_department(&row.current_department)?,
            id: row.id,
            full_name: row.full_name,
            age: row.age,
            gender: row.gender,
            phone_number: row.phone_number,
            address: row.address,
            nida_number: row.nida_number,
            department_since: row.department_since,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_department(s: &str) -> DbResult<Department> {
    s.parse()
        .map_err(|e: crate::models::UnknownDepartment| DbError::Constraint(e.to_string()))
}
