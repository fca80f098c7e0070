//! Care-Flow Core Library
//!
//! Patient flow for a small outpatient clinic: every patient moves through a fixed
//! pipeline of departments, and the billable events along the way (lab tests,
//! dispensed drugs) are recorded together with the move that caused them.
//!
//! # Architecture
//!
//! ```text
//!   Reception ──► Consultation ──┬──► Laboratory ──► (back to Consultation)
//!                                │        │
//!                                │   LabResult + Invoice
//!                                │
//!                                ├──► Pharmacy ──► Billing ──► Discharged
//!                                │        │           │
//!                                │   stock - q    settle all
//!                                │   + Invoice     Invoices
//!                                │
//!                                └──► Discharged (subject to discharge policy)
//!
//!                ┌─────────────────────────────────────────┐
//!                │  one IMMEDIATE transaction per advance  │
//!                │  side effects + department CAS          │
//!                └────────────────────┬────────────────────┘
//!                                     │
//!                        QueueView (reads the same store)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite record store
//! - [`models`]: Domain types (Patient, Invoice, InventoryItem, etc.)
//! - [`workflow`]: Transition table, side effects, billing and queues
//! - [`config`]: TOML configuration

pub mod config;
pub mod db;
pub mod models;
pub mod workflow;

// Re-export commonly used types
pub use config::{DischargePolicy, WorkflowConfig};
pub use db::Database;
pub use models::{
    AdjustmentReason, ConsultationNote, Department, InventoryItem, Invoice, InvoiceStatus,
    LabResult, NewInventoryItem, NewPatient, NewVitals, Patient, ServiceKind, StockMovement,
    Vitals,
};
pub use workflow::{
    PatientRecord, QueueView, TransitionOutcome, TransitionPayload, Workflow, WorkflowError,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use models::{ChargeSource, Consultation, ServiceCatalogEntry};
use workflow::{DispenseRequest, LabResultEntry, SideEffect};

// =========================================================================
// FFI Error Type
// =========================================================================

/// One variant per workflow failure kind, so hosts can branch without
/// parsing messages. `InvalidInput` is for host strings that do not parse.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CareFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Wrong department: {0}")]
    WrongDepartment(String),

    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Patient discharged: {0}")]
    PatientDischarged(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Already paid: {0}")]
    AlreadyPaid(String),

    #[error("Outstanding balance: {0}")]
    OutstandingBalance(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<WorkflowError> for CareFlowError {
    fn from(e: WorkflowError) -> Self {
        let message = e.to_string();
        match e {
            WorkflowError::InvalidTransition { .. } => CareFlowError::InvalidTransition(message),
            WorkflowError::WrongDepartment { .. } => CareFlowError::WrongDepartment(message),
            WorkflowError::PatientNotFound(_) => CareFlowError::PatientNotFound(message),
            WorkflowError::PatientDischarged(_) => CareFlowError::PatientDischarged(message),
            WorkflowError::ItemNotFound(_) => CareFlowError::ItemNotFound(message),
            WorkflowError::InvoiceNotFound(_) => CareFlowError::InvoiceNotFound(message),
            WorkflowError::InsufficientStock { .. } => CareFlowError::InsufficientStock(message),
            WorkflowError::AlreadyPaid(_) => CareFlowError::AlreadyPaid(message),
            WorkflowError::OutstandingBalance { .. } => CareFlowError::OutstandingBalance(message),
            WorkflowError::InvalidPayload(_) => CareFlowError::InvalidPayload(message),
            WorkflowError::ConflictingUpdate(_) => CareFlowError::Conflict(message),
            WorkflowError::RecordStoreFailure(_) => CareFlowError::DatabaseError(message),
        }
    }
}

impl From<db::DbError> for CareFlowError {
    fn from(e: db::DbError) -> Self {
        CareFlowError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for CareFlowError {
    fn from(e: serde_json::Error) -> Self {
        CareFlowError::SerializationError(e.to_string())
    }
}

impl From<models::UnknownDepartment> for CareFlowError {
    fn from(e: models::UnknownDepartment) -> Self {
        CareFlowError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CareFlowError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CareFlowError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<CareFlowCore>, CareFlowError> {
    CareFlowCore::open(&path, WorkflowConfig::default())
}

/// Open or create a database, reading settings from a TOML file.
#[uniffi::export]
pub fn open_database_with_config(
    path: String,
    config_path: String,
) -> Result<Arc<CareFlowCore>, CareFlowError> {
    let config = WorkflowConfig::load(&config_path)
        .map_err(|e| CareFlowError::ConfigError(format!("{:#}", e)))?;
    CareFlowCore::open(&path, config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<CareFlowCore>, CareFlowError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(CareFlowCore {
        db: Arc::new(Mutex::new(db)),
        config: WorkflowConfig::default(),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe workflow handle for FFI.
#[derive(uniffi::Object)]
pub struct CareFlowCore {
    db: Arc<Mutex<Database>>,
    config: WorkflowConfig,
}

impl CareFlowCore {
    fn open(path: &str, config: WorkflowConfig) -> Result<Arc<Self>, CareFlowError> {
        let db = Database::open_with(path, &config.store)?;
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }))
    }
}

#[uniffi::export]
impl CareFlowCore {
    // =========================================================================
    // Reception
    // =========================================================================

    /// Register a patient at reception.
    pub fn register_patient(&self, intake: FfiNewPatient) -> Result<FfiPatient, CareFlowError> {
        let db = self.db.lock()?;
        let patient = Workflow::new(&db, &self.config).register_patient(intake.into())?;
        Ok(patient.into())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, CareFlowError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(&patient_id)?.map(|p| p.into()))
    }

    /// Search patients by name prefix.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, CareFlowError> {
        let db = self.db.lock()?;
        let patients = Workflow::new(&db, &self.config).search_patients(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Move a patient to `department` with the payload that move requires.
    pub fn advance(
        &self,
        patient_id: String,
        department: String,
        payload: FfiTransitionPayload,
    ) -> Result<FfiTransitionOutcome, CareFlowError> {
        let target: Department = department.parse()?;
        let db = self.db.lock()?;
        let outcome = Workflow::new(&db, &self.config).advance(&patient_id, target, payload.into())?;
        Ok(outcome.into())
    }

    /// Issue a drug to a patient in the Pharmacy and send them to Billing.
    pub fn dispense(
        &self,
        patient_id: String,
        item_id: String,
        quantity: i64,
    ) -> Result<FfiTransitionOutcome, CareFlowError> {
        let db = self.db.lock()?;
        let outcome = Workflow::new(&db, &self.config).dispense(&patient_id, &item_id, quantity)?;
        Ok(outcome.into())
    }

    /// Append a consultation note for a patient in the consultation room.
    pub fn record_consultation(
        &self,
        patient_id: String,
        note: FfiConsultationNote,
    ) -> Result<FfiConsultation, CareFlowError> {
        let db = self.db.lock()?;
        let consultation =
            Workflow::new(&db, &self.config).record_consultation(&patient_id, note.into())?;
        Ok(consultation.into())
    }

    /// Record blood pressure, pulse, temperature and weight taken at triage.
    pub fn record_vitals(
        &self,
        patient_id: String,
        readings: FfiNewVitals,
    ) -> Result<FfiVitals, CareFlowError> {
        let db = self.db.lock()?;
        let vitals = Workflow::new(&db, &self.config).record_vitals(&patient_id, readings.into())?;
        Ok(vitals.into())
    }

    // =========================================================================
    // Billing
    // =========================================================================

    /// Mark an invoice paid.
    pub fn confirm_payment(
        &self,
        invoice_id: String,
        payment_method: Option<String>,
    ) -> Result<FfiInvoice, CareFlowError> {
        let db = self.db.lock()?;
        let invoice = Workflow::new(&db, &self.config)
            .confirm_payment(&invoice_id, payment_method.as_deref())?;
        Ok(invoice.into())
    }

    /// Raise a manual charge against a patient.
    pub fn raise_invoice(
        &self,
        patient_id: String,
        amount: i64,
        description: String,
    ) -> Result<FfiInvoice, CareFlowError> {
        let db = self.db.lock()?;
        let invoice =
            Workflow::new(&db, &self.config).raise_invoice(&patient_id, amount, &description)?;
        Ok(invoice.into())
    }

    /// Bill the consultation fee for a visit.
    pub fn charge_consultation_fee(
        &self,
        patient_id: String,
        amount: i64,
    ) -> Result<FfiInvoice, CareFlowError> {
        let db = self.db.lock()?;
        let invoice = Workflow::new(&db, &self.config).charge_consultation_fee(&patient_id, amount)?;
        Ok(invoice.into())
    }

    /// Sum of a patient's unpaid invoices.
    pub fn outstanding_balance(&self, patient_id: String) -> Result<i64, CareFlowError> {
        let db = self.db.lock()?;
        Ok(Workflow::new(&db, &self.config).outstanding_balance(&patient_id)?)
    }

    /// All invoices for a patient, oldest first.
    pub fn invoices_for_patient(&self, patient_id: String) -> Result<Vec<FfiInvoice>, CareFlowError> {
        let db = self.db.lock()?;
        let invoices = db.list_invoices_for_patient(&patient_id)?;
        Ok(invoices.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // Pharmacy Inventory
    // =========================================================================

    /// Add an inventory item.
    pub fn add_inventory_item(
        &self,
        item: FfiNewInventoryItem,
    ) -> Result<FfiInventoryItem, CareFlowError> {
        let db = self.db.lock()?;
        let item = Workflow::new(&db, &self.config).add_inventory_item(item.into())?;
        Ok(item.into())
    }

    /// Adjust stock for a delivery, write-off or stock-take correction.
    pub fn adjust_stock(
        &self,
        item_id: String,
        delta: i64,
        reason: String,
    ) -> Result<FfiStockMovement, CareFlowError> {
        let reason = AdjustmentReason::parse(&reason)
            .ok_or_else(|| CareFlowError::InvalidInput(format!("Unknown adjustment reason: {}", reason)))?;
        let db = self.db.lock()?;
        let movement = Workflow::new(&db, &self.config).adjust_stock(&item_id, delta, reason)?;
        Ok(movement.into())
    }

    /// List all inventory items.
    pub fn list_inventory(&self) -> Result<Vec<FfiInventoryItem>, CareFlowError> {
        let db = self.db.lock()?;
        let items = db.list_inventory_items()?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // Service Catalog
    // =========================================================================

    /// Add or reprice a lab test or drug template. `kind` is "lab_test" or "drug".
    pub fn add_service(
        &self,
        name: String,
        price: i64,
        kind: String,
    ) -> Result<FfiServiceEntry, CareFlowError> {
        let kind = parse_service_kind(&kind)?;
        let db = self.db.lock()?;
        let entry = Workflow::new(&db, &self.config).add_service(&name, price, kind)?;
        Ok(entry.into())
    }

    /// List catalog entries of one kind.
    pub fn list_services(&self, kind: String) -> Result<Vec<FfiServiceEntry>, CareFlowError> {
        let kind = parse_service_kind(&kind)?;
        let db = self.db.lock()?;
        let entries = Workflow::new(&db, &self.config).list_services(kind)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Queues
    // =========================================================================

    /// Patients waiting in a department, first come first served.
    pub fn queue(&self, department: String) -> Result<Vec<FfiPatient>, CareFlowError> {
        let department: Department = department.parse()?;
        let db = self.db.lock()?;
        let patients = QueueView::new(&db).patients_in(department)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Head count per department.
    pub fn queue_lengths(&self) -> Result<Vec<FfiQueueLength>, CareFlowError> {
        let db = self.db.lock()?;
        let lengths = QueueView::new(&db).queue_lengths()?;
        Ok(lengths
            .into_iter()
            .map(|(department, count)| FfiQueueLength {
                department: department.to_string(),
                count: count as u32,
            })
            .collect())
    }

    /// Items at or below the configured low-stock threshold.
    pub fn low_stock(&self) -> Result<Vec<FfiInventoryItem>, CareFlowError> {
        let db = self.db.lock()?;
        let items = QueueView::new(&db).low_stock(self.config.inventory.low_stock_threshold)?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    /// The cashier's worklist.
    pub fn unpaid_invoices(&self) -> Result<Vec<FfiInvoice>, CareFlowError> {
        let db = self.db.lock()?;
        let invoices = QueueView::new(&db).unpaid_invoices()?;
        Ok(invoices.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Lab results for a patient, newest first.
    pub fn lab_results_for_patient(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiLabResult>, CareFlowError> {
        let db = self.db.lock()?;
        let results = db.list_lab_results_for_patient(&patient_id)?;
        Ok(results.into_iter().map(|r| r.into()).collect())
    }

    /// Vitals for a patient, newest first.
    pub fn vitals_for_patient(&self, patient_id: String) -> Result<Vec<FfiVitals>, CareFlowError> {
        let db = self.db.lock()?;
        let vitals = Workflow::new(&db, &self.config).vitals_for_patient(&patient_id)?;
        Ok(vitals.into_iter().map(|v| v.into()).collect())
    }

    /// Full patient record (demographics, notes, results, vitals, invoices) as JSON.
    pub fn export_patient_record_json(&self, patient_id: String) -> Result<String, CareFlowError> {
        let db = self.db.lock()?;
        let record = Workflow::new(&db, &self.config).patient_record(&patient_id)?;
        Ok(serde_json::to_string_pretty(&record)?)
    }
}

fn parse_service_kind(kind: &str) -> Result<ServiceKind, CareFlowError> {
    ServiceKind::parse(kind)
        .ok_or_else(|| CareFlowError::InvalidInput(format!("Unknown service kind: {}", kind)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe intake form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub nida_number: Option<String>,
}

impl From<FfiNewPatient> for NewPatient {
    fn from(intake: FfiNewPatient) -> Self {
        NewPatient {
            full_name: intake.full_name,
            age: intake.age,
            gender: intake.gender,
            phone_number: intake.phone_number,
            address: intake.address,
            nida_number: intake.nida_number,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub full_name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub nida_number: Option<String>,
    pub current_department: String,
    pub department_since: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            full_name: patient.full_name,
            age: patient.age,
            gender: patient.gender,
            phone_number: patient.phone_number,
            nida_number: patient.nida_number,
            current_department: patient.current_department.to_string(),
            department_since: patient.department_since,
        }
    }
}

/// FFI-safe consultation note.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConsultationNote {
    pub chief_complaint: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

impl From<FfiConsultationNote> for ConsultationNote {
    fn from(note: FfiConsultationNote) -> Self {
        ConsultationNote {
            chief_complaint: note.chief_complaint,
            diagnosis: note.diagnosis,
            prescription: note.prescription,
            notes: note.notes,
        }
    }
}

/// FFI-safe consultation record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConsultation {
    pub id: String,
    pub patient_id: String,
    pub chief_complaint: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub created_at: String,
}

impl From<Consultation> for FfiConsultation {
    fn from(consultation: Consultation) -> Self {
        Self {
            id: consultation.id,
            patient_id: consultation.patient_id,
            chief_complaint: consultation.chief_complaint,
            diagnosis: consultation.diagnosis,
            prescription: consultation.prescription,
            created_at: consultation.created_at,
        }
    }
}

/// FFI-safe transition payload.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiTransitionPayload {
    NoPayload,
    Consultation {
        note: FfiConsultationNote,
    },
    LabResult {
        test_name: String,
        result_value: String,
        cost: Option<i64>,
    },
    Dispense {
        item_id: String,
        quantity: i64,
    },
    Settlement {
        payment_method: Option<String>,
    },
}

impl From<FfiTransitionPayload> for TransitionPayload {
    fn from(payload: FfiTransitionPayload) -> Self {
        match payload {
            FfiTransitionPayload::NoPayload => TransitionPayload::None,
            FfiTransitionPayload::Consultation { note } => {
                TransitionPayload::Consultation(note.into())
            }
            FfiTransitionPayload::LabResult {
                test_name,
                result_value,
                cost,
            } => TransitionPayload::LabResult(LabResultEntry {
                test_name,
                result_value,
                cost,
            }),
            FfiTransitionPayload::Dispense { item_id, quantity } => {
                TransitionPayload::Dispense(DispenseRequest { item_id, quantity })
            }
            FfiTransitionPayload::Settlement { payment_method } => {
                TransitionPayload::Settlement { payment_method }
            }
        }
    }
}

/// FFI-safe transition result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTransitionOutcome {
    pub patient: FfiPatient,
    pub from_department: String,
    pub to_department: String,
    pub lab_results: Vec<FfiLabResult>,
    pub stock_movements: Vec<FfiStockMovement>,
    pub raised_invoices: Vec<FfiInvoice>,
    pub settled_invoices: Vec<FfiInvoice>,
}

impl From<TransitionOutcome> for FfiTransitionOutcome {
    fn from(outcome: TransitionOutcome) -> Self {
        let mut converted = Self {
            patient: outcome.patient.into(),
            from_department: outcome.from.to_string(),
            to_department: outcome.to.to_string(),
            lab_results: Vec::new(),
            stock_movements: Vec::new(),
            raised_invoices: Vec::new(),
            settled_invoices: Vec::new(),
        };
        for effect in outcome.effects {
            match effect {
                SideEffect::ConsultationNoted(_) => {}
                SideEffect::LabRecorded(result) => converted.lab_results.push(result.into()),
                SideEffect::StockDispensed(movement) => {
                    converted.stock_movements.push(movement.into())
                }
                SideEffect::InvoiceRaised(invoice) => converted.raised_invoices.push(invoice.into()),
                SideEffect::InvoiceSettled(invoice) => {
                    converted.settled_invoices.push(invoice.into())
                }
            }
        }
        converted
    }
}

/// FFI-safe lab result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabResult {
    pub id: String,
    pub patient_id: String,
    pub test_name: String,
    pub result_value: String,
    pub cost: i64,
    pub created_at: String,
}

impl From<LabResult> for FfiLabResult {
    fn from(result: LabResult) -> Self {
        Self {
            id: result.id,
            patient_id: result.patient_id,
            test_name: result.test_name,
            result_value: result.result_value,
            cost: result.cost,
            created_at: result.created_at,
        }
    }
}

/// FFI-safe vitals form. Leave a field empty if it was not taken.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewVitals {
    pub systolic: Option<i64>,
    pub diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
}

impl From<FfiNewVitals> for NewVitals {
    fn from(form: FfiNewVitals) -> Self {
        NewVitals {
            systolic: form.systolic,
            diastolic: form.diastolic,
            heart_rate: form.heart_rate,
            temperature: form.temperature,
            weight: form.weight,
        }
    }
}

/// FFI-safe vitals record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitals {
    pub id: String,
    pub patient_id: String,
    pub systolic: Option<i64>,
    pub diastolic: Option<i64>,
    pub heart_rate: Option<i64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub created_at: String,
}

impl From<Vitals> for FfiVitals {
    fn from(vitals: Vitals) -> Self {
        let r = vitals.readings;
        Self {
            id: vitals.id,
            patient_id: vitals.patient_id,
            systolic: r.systolic,
            diastolic: r.diastolic,
            heart_rate: r.heart_rate,
            temperature: r.temperature,
            weight: r.weight,
            created_at: vitals.created_at,
        }
    }
}

/// FFI-safe invoice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInvoice {
    pub id: String,
    pub patient_id: String,
    pub amount: i64,
    pub status: String,
    pub description: String,
    pub source: String,
    pub payment_method: Option<String>,
    pub created_at: String,
    pub paid_at: Option<String>,
}

impl From<Invoice> for FfiInvoice {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            patient_id: invoice.patient_id,
            amount: invoice.amount,
            status: match invoice.status {
                InvoiceStatus::Unpaid => "unpaid".into(),
                InvoiceStatus::Paid => "paid".into(),
            },
            description: invoice.description,
            source: match invoice.source {
                ChargeSource::LabTest => "lab_test".into(),
                ChargeSource::Dispensing => "dispensing".into(),
                ChargeSource::Consultation => "consultation".into(),
                ChargeSource::Manual => "manual".into(),
            },
            payment_method: invoice.payment_method,
            created_at: invoice.created_at,
            paid_at: invoice.paid_at,
        }
    }
}

/// FFI-safe new inventory item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewInventoryItem {
    pub item_name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub unit_price: i64,
}

impl From<FfiNewInventoryItem> for NewInventoryItem {
    fn from(item: FfiNewInventoryItem) -> Self {
        NewInventoryItem {
            item_name: item.item_name,
            category: item.category,
            stock_quantity: item.stock_quantity,
            unit_price: item.unit_price,
        }
    }
}

/// FFI-safe inventory item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInventoryItem {
    pub id: String,
    pub item_name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub unit_price: i64,
}

impl From<InventoryItem> for FfiInventoryItem {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id,
            item_name: item.item_name,
            category: item.category,
            stock_quantity: item.stock_quantity,
            unit_price: item.unit_price,
        }
    }
}

/// FFI-safe stock ledger row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStockMovement {
    pub id: String,
    pub item_id: String,
    pub delta: i64,
    pub reason: String,
    pub resulting_quantity: i64,
    pub patient_id: Option<String>,
    pub created_at: String,
}

impl From<StockMovement> for FfiStockMovement {
    fn from(movement: StockMovement) -> Self {
        Self {
            id: movement.id,
            item_id: movement.item_id,
            delta: movement.delta,
            reason: movement.reason.as_str().to_string(),
            resulting_quantity: movement.resulting_quantity,
            patient_id: movement.patient_id,
            created_at: movement.created_at,
        }
    }
}

/// FFI-safe catalog entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceEntry {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub kind: String,
}

impl From<ServiceCatalogEntry> for FfiServiceEntry {
    fn from(entry: ServiceCatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            price: entry.price,
            kind: entry.kind.as_str().to_string(),
        }
    }
}

/// FFI-safe queue length.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueueLength {
    pub department: String,
    pub count: u32,
}
