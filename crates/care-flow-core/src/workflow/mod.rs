//! Patient workflow engine.
//!
//! Every operation runs in one write transaction against the record store: the
//! patient (or item, or invoice) is re-read inside it, the side effects are
//! written, and the department/stock/status change is a compare-and-set. Any
//! error drops the transaction, so nothing is left half-applied.

mod advance;
mod billing;
mod dispensing;
mod queue;
mod transition;

pub use queue::*;
pub use transition::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::WorkflowConfig;
use crate::db::{Database, DbError};
use crate::models::{
    Consultation, ConsultationNote, Department, Invoice, LabResult, NewPatient, NewVitals,
    Patient, ServiceCatalogEntry, ServiceKind, Vitals,
};

/// Workflow errors. None of them leave an entity modified.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: Department, to: Department },

    #[error("Patient {patient_id} is in {actual}, not {expected}")]
    WrongDepartment {
        patient_id: String,
        expected: Department,
        actual: Department,
    },

    #[error("Insufficient stock for {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Patient already discharged: {0}")]
    PatientDischarged(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Invoice already paid: {0}")]
    AlreadyPaid(String),

    #[error("Patient {patient_id} has an outstanding balance of {amount}")]
    OutstandingBalance { patient_id: String, amount: i64 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Conflicting update on {0}")]
    ConflictingUpdate(String),

    #[error("Record store failure: {0}")]
    RecordStoreFailure(#[from] DbError),
}

impl From<rusqlite::Error> for WorkflowError {
    fn from(e: rusqlite::Error) -> Self {
        WorkflowError::RecordStoreFailure(DbError::Sqlite(e))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Everything recorded about one patient visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub patient: Patient,
    /// Newest first
    pub consultations: Vec<Consultation>,
    /// Newest first
    pub lab_results: Vec<LabResult>,
    /// Newest first
    pub vitals: Vec<Vitals>,
    /// Oldest first
    pub invoices: Vec<Invoice>,
    /// Sum of unpaid invoices
    pub outstanding: i64,
}

/// Workflow engine over an explicitly passed record store.
pub struct Workflow<'a> {
    db: &'a Database,
    config: WorkflowConfig,
}

impl<'a> Workflow<'a> {
    /// Create a workflow engine.
    pub fn new(db: &'a Database, config: &WorkflowConfig) -> Self {
        Self {
            db,
            config: config.clone(),
        }
    }

    /// Create a workflow engine with default configuration.
    pub fn with_defaults(db: &'a Database) -> Self {
        Self::new(db, &WorkflowConfig::default())
    }

    /// Configuration in effect.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Read-only queue projections over the same store.
    pub fn queues(&self) -> QueueView<'a> {
        QueueView::new(self.db)
    }

    /// Admit a patient at reception.
    pub fn register_patient(&self, intake: NewPatient) -> WorkflowResult<Patient> {
        if intake.full_name.trim().is_empty() {
            return Err(WorkflowError::InvalidPayload("patient name is required".into()));
        }

        let patient = Patient::admit(NewPatient {
            full_name: intake.full_name.trim().to_string(),
            ..intake
        });
        self.db.insert_patient(&patient)?;

        info!(patient_id = %patient.id, "patient registered at reception");
        Ok(patient)
    }

    /// Append a consultation note for a patient who is with the doctor.
    pub fn record_consultation(
        &self,
        patient_id: &str,
        note: ConsultationNote,
    ) -> WorkflowResult<Consultation> {
        validate_note(&note)?;

        let tx = self.db.write_transaction()?;
        let patient = self.load_patient(patient_id)?;
        if patient.current_department != Department::Consultation {
            return Err(WorkflowError::WrongDepartment {
                patient_id: patient_id.to_string(),
                expected: Department::Consultation,
                actual: patient.current_department,
            });
        }

        let consultation = Consultation::from_note(patient_id, note);
        self.db.insert_consultation(&consultation)?;
        tx.commit()?;

        info!(patient_id, consultation_id = %consultation.id, "consultation recorded");
        Ok(consultation)
    }

    /// Record a set of vitals for a patient still in the building.
    pub fn record_vitals(&self, patient_id: &str, readings: NewVitals) -> WorkflowResult<Vitals> {
        validate_vitals(&readings)?;

        let tx = self.db.write_transaction()?;
        let patient = self.load_patient(patient_id)?;
        if patient.is_discharged() {
            return Err(WorkflowError::PatientDischarged(patient_id.to_string()));
        }

        let vitals = Vitals::taken(patient_id, readings);
        self.db.insert_vitals(&vitals)?;
        tx.commit()?;

        info!(
            patient_id,
            vitals_id = %vitals.id,
            department = %patient.current_department,
            "vitals recorded"
        );
        Ok(vitals)
    }

    /// A patient's vitals, newest first.
    pub fn vitals_for_patient(&self, patient_id: &str) -> WorkflowResult<Vec<Vitals>> {
        self.load_patient(patient_id)?;
        Ok(self.db.list_vitals_for_patient(patient_id)?)
    }

    /// Add or reprice a service catalog entry.
    pub fn add_service(
        &self,
        name: &str,
        price: i64,
        kind: ServiceKind,
    ) -> WorkflowResult<ServiceCatalogEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkflowError::InvalidPayload("service name is required".into()));
        }
        if price < 0 {
            return Err(WorkflowError::InvalidPayload(format!(
                "service price must not be negative, got {}",
                price
            )));
        }

        let entry = ServiceCatalogEntry::new(name, price, kind);
        self.db.upsert_service(&entry)?;

        // An existing entry keeps its id
        Ok(self
            .db
            .find_service_by_name(kind, name, 1.0)?
            .unwrap_or(entry))
    }

    /// Catalog entries of one kind, by name.
    pub fn list_services(&self, kind: ServiceKind) -> WorkflowResult<Vec<ServiceCatalogEntry>> {
        Ok(self.db.list_services(kind)?)
    }

    /// Patients whose name starts with `query`.
    pub fn search_patients(&self, query: &str, limit: usize) -> WorkflowResult<Vec<Patient>> {
        Ok(self.db.search_patients(query.trim(), limit)?)
    }

    /// Patient with their clinical and billing history.
    pub fn patient_record(&self, patient_id: &str) -> WorkflowResult<PatientRecord> {
        let patient = self.load_patient(patient_id)?;
        Ok(PatientRecord {
            consultations: self.db.list_consultations_for_patient(patient_id)?,
            lab_results: self.db.list_lab_results_for_patient(patient_id)?,
            vitals: self.db.list_vitals_for_patient(patient_id)?,
            invoices: self.db.list_invoices_for_patient(patient_id)?,
            outstanding: self.db.outstanding_balance(patient_id)?,
            patient,
        })
    }

    fn load_patient(&self, patient_id: &str) -> WorkflowResult<Patient> {
        self.db
            .get_patient(patient_id)?
            .ok_or_else(|| WorkflowError::PatientNotFound(patient_id.to_string()))
    }
}

fn validate_note(note: &ConsultationNote) -> WorkflowResult<()> {
    if note.chief_complaint.trim().is_empty() {
        return Err(WorkflowError::InvalidPayload(
            "consultation note needs a chief complaint".into(),
        ));
    }
    Ok(())
}

fn validate_vitals(readings: &NewVitals) -> WorkflowResult<()> {
    if readings.is_empty() {
        return Err(WorkflowError::InvalidPayload("vitals need at least one reading".into()));
    }

    let counts = [
        ("systolic", readings.systolic),
        ("diastolic", readings.diastolic),
        ("heart rate", readings.heart_rate),
    ];
    for (name, value) in counts {
        if let Some(v) = value.filter(|v| *v <= 0) {
            return Err(WorkflowError::InvalidPayload(format!(
                "{} must be positive, got {}",
                name, v
            )));
        }
    }

    let measures = [("temperature", readings.temperature), ("weight", readings.weight)];
    for (name, value) in measures {
        if let Some(v) = value.filter(|v| !v.is_finite() || *v <= 0.0) {
            return Err(WorkflowError::InvalidPayload(format!(
                "{} must be positive, got {}",
                name, v
            )));
        }
    }
    Ok(())
}
