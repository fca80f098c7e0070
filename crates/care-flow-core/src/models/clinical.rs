//! Clinical records produced along the pipeline.

use serde::{Deserialize, Serialize};

/// A completed lab investigation with its price snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResult {
    /// UUID
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    /// Test performed (e.g., "Malaria mRDT")
    pub test_name: String,
    /// Findings
    pub result_value: String,
    /// Price captured at recording time
    pub cost: i64,
    /// Always "completed" once recorded
    pub status: String,
    /// Creation timestamp
    pub created_at: String,
}

impl LabResult {
    pub fn completed(
        patient_id: impl Into<String>,
        test_name: impl Into<String>,
        result_value: impl Into<String>,
        cost: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            test_name: test_name.into(),
            result_value: result_value.into(),
            cost,
            status: "completed".into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Doctor's note fields, as entered in the consultation room.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsultationNote {
    pub chief_complaint: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

/// Append-only consultation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    /// UUID
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    pub chief_complaint: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Consultation {
    pub fn from_note(patient_id: impl Into<String>, note: ConsultationNote) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            chief_complaint: note.chief_complaint,
            diagnosis: note.diagnosis,
            prescription: note.prescription,
            notes: note.notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Readings taken at triage. Any field may be left blank.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NewVitals {
    /// Blood pressure, mmHg
    pub systolic: Option<i64>,
    pub diastolic: Option<i64>,
    /// Beats per minute
    pub heart_rate: Option<i64>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Kilograms
    pub weight: Option<f64>,
}

impl NewVitals {
    /// True when no reading was entered.
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none()
            && self.diastolic.is_none()
            && self.heart_rate.is_none()
            && self.temperature.is_none()
            && self.weight.is_none()
    }

    /// Blood pressure as "120/80", when both halves were taken.
    pub fn blood_pressure(&self) -> Option<String> {
        Some(format!("{}/{}", self.systolic?, self.diastolic?))
    }
}

/// Append-only vitals record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vitals {
    /// UUID
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    #[serde(flatten)]
    pub readings: NewVitals,
    /// Creation timestamp
    pub created_at: String,
}

impl Vitals {
    pub fn taken(patient_id: impl Into<String>, readings: NewVitals) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            readings,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
