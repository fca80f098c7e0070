//! Cashier operations.

use tracing::info;

use super::{Workflow, WorkflowError, WorkflowResult};
use crate::models::{ChargeSource, Invoice};

const CONSULTATION_FEE: &str = "Consultation Fee";

impl<'a> Workflow<'a> {
    /// Settle a single invoice.
    ///
    /// Paying an invoice twice is an error (`AlreadyPaid`), not a no-op.
    pub fn confirm_payment(
        &self,
        invoice_id: &str,
        payment_method: Option<&str>,
    ) -> WorkflowResult<Invoice> {
        let tx = self.db.write_transaction()?;

        let invoice = self
            .db
            .get_invoice(invoice_id)?
            .ok_or_else(|| WorkflowError::InvoiceNotFound(invoice_id.to_string()))?;
        if invoice.is_paid() {
            return Err(WorkflowError::AlreadyPaid(invoice_id.to_string()));
        }

        let now = chrono::Utc::now().to_rfc3339();
        if !self.db.mark_invoice_paid(invoice_id, payment_method, &now)? {
            return Err(WorkflowError::AlreadyPaid(invoice_id.to_string()));
        }
        let paid = self
            .db
            .get_invoice(invoice_id)?
            .ok_or_else(|| WorkflowError::InvoiceNotFound(invoice_id.to_string()))?;
        tx.commit()?;

        info!(
            invoice_id,
            patient_id = %paid.patient_id,
            amount = paid.amount,
            method = paid.payment_method.as_deref().unwrap_or("unspecified"),
            "payment confirmed"
        );
        Ok(paid)
    }

    /// Raise a manual charge at the cashier.
    pub fn raise_invoice(
        &self,
        patient_id: &str,
        amount: i64,
        description: &str,
    ) -> WorkflowResult<Invoice> {
        self.raise_charge(patient_id, amount, description, ChargeSource::Manual)
    }

    /// Bill the consultation fee for a visit.
    pub fn charge_consultation_fee(&self, patient_id: &str, amount: i64) -> WorkflowResult<Invoice> {
        self.raise_charge(patient_id, amount, CONSULTATION_FEE, ChargeSource::Consultation)
    }

    fn raise_charge(
        &self,
        patient_id: &str,
        amount: i64,
        description: &str,
        source: ChargeSource,
    ) -> WorkflowResult<Invoice> {
        if amount <= 0 {
            return Err(WorkflowError::InvalidPayload(format!(
                "invoice amount must be positive, got {}",
                amount
            )));
        }
        if description.trim().is_empty() {
            return Err(WorkflowError::InvalidPayload("invoice needs a description".into()));
        }

        let tx = self.db.write_transaction()?;
        let patient = self.load_patient(patient_id)?;
        if patient.is_discharged() {
            return Err(WorkflowError::PatientDischarged(patient_id.to_string()));
        }

        let invoice = Invoice::unpaid(patient_id, amount, description.trim(), source);
        self.db.insert_invoice(&invoice)?;
        tx.commit()?;

        info!(
            patient_id,
            invoice_id = %invoice.id,
            amount,
            source = ?source,
            "invoice raised"
        );
        Ok(invoice)
    }

    /// Total of a patient's unpaid invoices.
    pub fn outstanding_balance(&self, patient_id: &str) -> WorkflowResult<i64> {
        self.load_patient(patient_id)?;
        Ok(self.db.outstanding_balance(patient_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Department, InvoiceStatus, NewPatient};
    use crate::workflow::TransitionPayload;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_confirm_payment_then_already_paid() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Neema Said")).unwrap();
        let invoice = workflow.raise_invoice(&patient.id, 2000, "Consultation Fee").unwrap();

        let paid = workflow.confirm_payment(&invoice.id, Some("cash")).unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(paid.payment_method.as_deref(), Some("cash"));
        assert!(paid.paid_at.is_some());

        let err = workflow.confirm_payment(&invoice.id, Some("mpesa")).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyPaid(_)));

        // The first settlement stands
        let stored = db.get_invoice(&invoice.id).unwrap().unwrap();
        assert_eq!(stored.payment_method.as_deref(), Some("cash"));
        assert_eq!(stored.paid_at, paid.paid_at);
    }

    #[test]
    fn test_confirm_unknown_invoice() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        assert!(matches!(
            workflow.confirm_payment("nope", None),
            Err(WorkflowError::InvoiceNotFound(_))
        ));
    }

    #[test]
    fn test_raise_invoice_validation() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Neema Said")).unwrap();

        assert!(matches!(
            workflow.raise_invoice(&patient.id, 0, "Consultation Fee"),
            Err(WorkflowError::InvalidPayload(_))
        ));
        assert!(matches!(
            workflow.raise_invoice(&patient.id, 500, " "),
            Err(WorkflowError::InvalidPayload(_))
        ));
        assert!(matches!(
            workflow.raise_invoice("ghost", 500, "Consultation Fee"),
            Err(WorkflowError::PatientNotFound(_))
        ));
    }

    #[test]
    fn test_no_charges_after_discharge() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Neema Said")).unwrap();
        for dept in [Department::Consultation, Department::Discharged] {
            workflow
                .advance(&patient.id, dept, TransitionPayload::None)
                .unwrap();
        }

        assert!(matches!(
            workflow.raise_invoice(&patient.id, 500, "Late fee"),
            Err(WorkflowError::PatientDischarged(_))
        ));
    }

    #[test]
    fn test_consultation_fee_is_tagged() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Neema Said")).unwrap();

        let fee = workflow.charge_consultation_fee(&patient.id, 2000).unwrap();
        assert_eq!(fee.source, ChargeSource::Consultation);
        assert_eq!(fee.description, "Consultation Fee");

        let manual = workflow.raise_invoice(&patient.id, 700, "Dressing").unwrap();
        assert_eq!(manual.source, ChargeSource::Manual);

        let stored = db.get_invoice(&fee.id).unwrap().unwrap();
        assert_eq!(stored.source, ChargeSource::Consultation);
        assert!(matches!(
            workflow.charge_consultation_fee(&patient.id, 0),
            Err(WorkflowError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_outstanding_balance() {
        let db = setup();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Neema Said")).unwrap();

        assert_eq!(workflow.outstanding_balance(&patient.id).unwrap(), 0);

        let fee = workflow.raise_invoice(&patient.id, 2000, "Consultation Fee").unwrap();
        workflow.raise_invoice(&patient.id, 700, "Dressing").unwrap();
        assert_eq!(workflow.outstanding_balance(&patient.id).unwrap(), 2700);

        workflow.confirm_payment(&fee.id, None).unwrap();
        assert_eq!(workflow.outstanding_balance(&patient.id).unwrap(), 700);

        assert!(workflow.outstanding_balance("ghost").is_err());
    }
}
