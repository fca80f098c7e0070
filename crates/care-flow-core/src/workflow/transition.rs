//! Department transition table, payloads and outcomes.

use serde::{Deserialize, Serialize};

use crate::models::{
    Consultation, ConsultationNote, Department, Invoice, LabResult, Patient, StockMovement,
};

/// What a legal transition must do besides moving the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Reception → Consultation
    Intake,
    /// Consultation → Laboratory / Pharmacy (test or prescription placed)
    Referral,
    /// Consultation → Discharged, subject to the discharge policy
    ClinicalDischarge,
    /// Laboratory → Consultation: record result and bill the test
    LabResult,
    /// Pharmacy → Billing: take stock and bill the drug
    Dispense,
    /// Billing → Discharged: settle every outstanding invoice
    Settlement,
}

/// Look up the transition kind for `(from, to)`. `None` means the move is illegal.
pub fn transition_kind(from: Department, to: Department) -> Option<TransitionKind> {
    use Department::*;

    match (from, to) {
        (Reception, Consultation) => Some(TransitionKind::Intake),
        (Consultation, Laboratory) | (Consultation, Pharmacy) => Some(TransitionKind::Referral),
        (Consultation, Discharged) => Some(TransitionKind::ClinicalDischarge),
        (Laboratory, Consultation) => Some(TransitionKind::LabResult),
        (Pharmacy, Billing) => Some(TransitionKind::Dispense),
        (Billing, Discharged) => Some(TransitionKind::Settlement),
        _ => None,
    }
}

/// Departments a patient in `from` may move to.
pub fn legal_successors(from: Department) -> Vec<Department> {
    Department::ALL
        .iter()
        .copied()
        .filter(|to| transition_kind(from, *to).is_some())
        .collect()
}

/// Lab findings entered when a patient leaves the Laboratory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabResultEntry {
    /// Test performed
    pub test_name: String,
    /// Findings
    pub result_value: String,
    /// Explicit price; `None` takes the current catalog price
    pub cost: Option<i64>,
}

impl LabResultEntry {
    /// Entry with an explicit price.
    pub fn priced(test_name: impl Into<String>, result_value: impl Into<String>, cost: i64) -> Self {
        Self {
            test_name: test_name.into(),
            result_value: result_value.into(),
            cost: Some(cost),
        }
    }

    /// Entry priced from the service catalog.
    pub fn from_catalog(test_name: impl Into<String>, result_value: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            result_value: result_value.into(),
            cost: None,
        }
    }
}

/// Drug issued when a patient leaves the Pharmacy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispenseRequest {
    /// Inventory item to take from
    pub item_id: String,
    /// Units to issue (at least 1)
    pub quantity: i64,
}

/// Data carried by an `advance` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum TransitionPayload {
    #[default]
    None,
    /// Doctor's note, accepted when leaving Consultation
    Consultation(ConsultationNote),
    /// Required when leaving Laboratory
    LabResult(LabResultEntry),
    /// Required when leaving Pharmacy
    Dispense(DispenseRequest),
    /// Optional payment details when leaving Billing
    Settlement { payment_method: Option<String> },
}

impl TransitionPayload {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TransitionPayload::None => "no payload",
            TransitionPayload::Consultation(_) => "a consultation note",
            TransitionPayload::LabResult(_) => "a lab result",
            TransitionPayload::Dispense(_) => "a dispense request",
            TransitionPayload::Settlement { .. } => "a settlement",
        }
    }
}

/// A record written as part of a transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SideEffect {
    ConsultationNoted(Consultation),
    LabRecorded(LabResult),
    InvoiceRaised(Invoice),
    StockDispensed(StockMovement),
    InvoiceSettled(Invoice),
}

/// Result of a committed transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionOutcome {
    /// Patient as committed, now in `to`
    pub patient: Patient,
    pub from: Department,
    pub to: Department,
    /// Records written alongside the move, in write order
    pub effects: Vec<SideEffect>,
}

impl TransitionOutcome {
    /// Invoices raised by this transition.
    pub fn raised_invoices(&self) -> Vec<&Invoice> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                SideEffect::InvoiceRaised(invoice) => Some(invoice),
                _ => None,
            })
            .collect()
    }

    /// Invoices settled by this transition.
    pub fn settled_invoices(&self) -> Vec<&Invoice> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                SideEffect::InvoiceSettled(invoice) => Some(invoice),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Department::*;

    #[test]
    fn test_table_matches_pipeline() {
        assert_eq!(legal_successors(Reception), vec![Consultation]);
        assert_eq!(legal_successors(Consultation), vec![Laboratory, Pharmacy, Discharged]);
        assert_eq!(legal_successors(Laboratory), vec![Consultation]);
        assert_eq!(legal_successors(Pharmacy), vec![Billing]);
        assert_eq!(legal_successors(Billing), vec![Discharged]);
        assert!(legal_successors(Discharged).is_empty());
    }

    #[test]
    fn test_no_self_transitions() {
        for dept in Department::ALL {
            assert_eq!(transition_kind(dept, dept), None);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(transition_kind(Laboratory, Consultation), Some(TransitionKind::LabResult));
        assert_eq!(transition_kind(Pharmacy, Billing), Some(TransitionKind::Dispense));
        assert_eq!(transition_kind(Billing, Discharged), Some(TransitionKind::Settlement));
        assert_eq!(transition_kind(Consultation, Discharged), Some(TransitionKind::ClinicalDischarge));
        // Skipping the cashier is not a path
        assert_eq!(transition_kind(Pharmacy, Discharged), None);
        assert_eq!(transition_kind(Reception, Laboratory), None);
    }

    #[test]
    fn test_default_payload_is_none() {
        assert_eq!(TransitionPayload::default(), TransitionPayload::None);
    }
}
