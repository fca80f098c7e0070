//! Patient models.

use serde::{Deserialize, Serialize};

use super::Department;

/// A patient record. `current_department` is the only field the workflow mutates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID, generated at intake
    pub id: String,
    /// Full name as registered at reception
    pub full_name: String,
    /// Age in years
    pub age: Option<u32>,
    /// Gender as recorded at intake
    pub gender: Option<String>,
    /// Contact phone number
    pub phone_number: Option<String>,
    /// Home address
    pub address: Option<String>,
    /// National ID (NIDA) number
    pub nida_number: Option<String>,
    /// Department the patient is currently queued in
    pub current_department: Department,
    /// When the patient entered `current_department`
    pub department_since: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Intake form data for a new patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub nida_number: Option<String>,
}

impl NewPatient {
    /// Intake form with only the required name.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }
}

impl Patient {
    /// Admit a patient at reception.
    pub fn admit(intake: NewPatient) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: intake.full_name,
            age: intake.age,
            gender: intake.gender,
            phone_number: intake.phone_number,
            address: intake.address,
            nida_number: intake.nida_number,
            current_department: Department::Reception,
            department_since: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check if the patient has left the pipeline.
    pub fn is_discharged(&self) -> bool {
        self.current_department.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_starts_at_reception() {
        let patient = Patient::admit(NewPatient::named("Amina Juma"));
        assert_eq!(patient.full_name, "Amina Juma");
        assert_eq!(patient.current_department, Department::Reception);
        assert!(!patient.is_discharged());
        assert_eq!(patient.id.len(), 36); // UUID format
    }

    #[test]
    fn test_admit_keeps_demographics() {
        let intake = NewPatient {
            full_name: "Baraka Mushi".into(),
            age: Some(42),
            gender: Some("Male".into()),
            phone_number: Some("+255700000001".into()),
            address: Some("Arusha".into()),
            nida_number: None,
        };
        let patient = Patient::admit(intake);
        assert_eq!(patient.age, Some(42));
        assert_eq!(patient.address.as_deref(), Some("Arusha"));
    }
}
