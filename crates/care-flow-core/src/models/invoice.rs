//! Invoice models.

use serde::{Deserialize, Serialize};

/// Payment state of an invoice. Moves only `Unpaid` → `Paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

/// What generated the charge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChargeSource {
    /// Lab test recorded in the Laboratory step
    LabTest,
    /// Drug dispensed in the Pharmacy step
    Dispensing,
    /// Consultation fee
    Consultation,
    /// Raised by hand at the cashier
    Manual,
}

/// A charge against a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    /// UUID
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    /// Amount in shillings
    pub amount: i64,
    /// Payment state
    pub status: InvoiceStatus,
    /// Line description shown to the cashier
    pub description: String,
    /// Billable event that produced this invoice
    pub source: ChargeSource,
    /// How the invoice was settled (cash, mobile money, insurance...)
    pub payment_method: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Settlement timestamp
    pub paid_at: Option<String>,
}

impl Invoice {
    /// Create a new unpaid invoice.
    pub fn unpaid(
        patient_id: impl Into<String>,
        amount: i64,
        description: impl Into<String>,
        source: ChargeSource,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            amount,
            status: InvoiceStatus::Unpaid,
            description: description.into(),
            source,
            payment_method: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            paid_at: None,
        }
    }

    /// Check if the invoice is settled.
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}
