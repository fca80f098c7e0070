//! `advance`: the department state machine and its side-effect handlers.

use tracing::{debug, info, warn};

use super::transition::{
    transition_kind, LabResultEntry, SideEffect, TransitionKind, TransitionOutcome,
    TransitionPayload,
};
use super::{validate_note, Workflow, WorkflowError, WorkflowResult};
use crate::config::DischargePolicy;
use crate::models::{
    ChargeSource, Consultation, ConsultationNote, Department, Invoice, LabResult, Patient,
    ServiceKind,
};

impl<'a> Workflow<'a> {
    /// Move a patient to `target`, applying the side effects that transition requires.
    ///
    /// The department changes only if every side effect was written; otherwise the
    /// error is returned and nothing is modified.
    pub fn advance(
        &self,
        patient_id: &str,
        target: Department,
        payload: TransitionPayload,
    ) -> WorkflowResult<TransitionOutcome> {
        match self.advance_in_transaction(patient_id, target, payload) {
            Ok(outcome) => {
                info!(
                    patient_id,
                    from = %outcome.from,
                    to = %outcome.to,
                    effects = outcome.effects.len(),
                    "patient advanced"
                );
                Ok(outcome)
            }
            Err(e) => {
                debug!(patient_id, to = %target, error = %e, "advance rejected");
                Err(e)
            }
        }
    }

    fn advance_in_transaction(
        &self,
        patient_id: &str,
        target: Department,
        payload: TransitionPayload,
    ) -> WorkflowResult<TransitionOutcome> {
        let tx = self.db.write_transaction()?;

        let patient = self.load_patient(patient_id)?;
        let from = patient.current_department;
        let kind = transition_kind(from, target)
            .ok_or(WorkflowError::InvalidTransition { from, to: target })?;

        let mut effects = Vec::new();
        self.apply_side_effects(&patient, target, kind, payload, &mut effects)?;

        let now = chrono::Utc::now().to_rfc3339();
        if !self
            .db
            .update_patient_department(patient_id, from, target, &now)?
        {
            return Err(WorkflowError::ConflictingUpdate(patient_id.to_string()));
        }

        tx.commit()?;

        Ok(TransitionOutcome {
            patient: Patient {
                current_department: target,
                department_since: now.clone(),
                updated_at: now,
                ..patient
            },
            from,
            to: target,
            effects,
        })
    }

    fn apply_side_effects(
        &self,
        patient: &Patient,
        target: Department,
        kind: TransitionKind,
        payload: TransitionPayload,
        effects: &mut Vec<SideEffect>,
    ) -> WorkflowResult<()> {
        match (kind, payload) {
            (TransitionKind::Intake, TransitionPayload::None) => Ok(()),

            (TransitionKind::Referral, TransitionPayload::None) => Ok(()),
            (TransitionKind::Referral, TransitionPayload::Consultation(note)) => {
                validate_note(&note)?;
                self.note_consultation(patient, note, effects)
            }

            (TransitionKind::ClinicalDischarge, TransitionPayload::None) => {
                self.check_discharge_policy(patient)
            }
            (TransitionKind::ClinicalDischarge, TransitionPayload::Consultation(note)) => {
                validate_note(&note)?;
                self.check_discharge_policy(patient)?;
                self.note_consultation(patient, note, effects)
            }

            (TransitionKind::LabResult, TransitionPayload::LabResult(entry)) => {
                self.record_lab_result(patient, entry, effects)
            }

            (TransitionKind::Dispense, TransitionPayload::Dispense(request)) => {
                self.dispense_within(patient, &request, effects)
            }

            (TransitionKind::Settlement, TransitionPayload::None) => {
                self.settle_outstanding(patient, None, effects)
            }
            (TransitionKind::Settlement, TransitionPayload::Settlement { payment_method }) => {
                self.settle_outstanding(patient, payment_method.as_deref(), effects)
            }

            (_, payload) => Err(payload_mismatch(patient.current_department, target, &payload)),
        }
    }

    fn note_consultation(
        &self,
        patient: &Patient,
        note: ConsultationNote,
        effects: &mut Vec<SideEffect>,
    ) -> WorkflowResult<()> {
        let consultation = Consultation::from_note(&patient.id, note);
        self.db.insert_consultation(&consultation)?;
        effects.push(SideEffect::ConsultationNoted(consultation));
        Ok(())
    }

    /// Discharges that skip the cashier go through the configured policy.
    fn check_discharge_policy(&self, patient: &Patient) -> WorkflowResult<()> {
        let outstanding = self.db.outstanding_balance(&patient.id)?;
        if outstanding == 0 {
            return Ok(());
        }

        match self.config.discharge_policy {
            DischargePolicy::BlockOutstanding => Err(WorkflowError::OutstandingBalance {
                patient_id: patient.id.clone(),
                amount: outstanding,
            }),
            DischargePolicy::AllowOutstanding => {
                warn!(
                    patient_id = %patient.id,
                    outstanding,
                    "discharging patient with unpaid invoices"
                );
                Ok(())
            }
        }
    }

    fn record_lab_result(
        &self,
        patient: &Patient,
        entry: LabResultEntry,
        effects: &mut Vec<SideEffect>,
    ) -> WorkflowResult<()> {
        let test_name = entry.test_name.trim();
        if test_name.is_empty() {
            return Err(WorkflowError::InvalidPayload("lab result needs a test name".into()));
        }

        // Catalog lookups also take the catalog's spelling of the test name
        let (test_name, cost) = match entry.cost {
            Some(cost) if cost < 0 => {
                return Err(WorkflowError::InvalidPayload(format!(
                    "lab cost must not be negative, got {}",
                    cost
                )))
            }
            Some(cost) => (test_name.to_string(), cost),
            None => self
                .db
                .find_service_by_name(
                    ServiceKind::LabTest,
                    test_name,
                    self.config.catalog.fuzzy_match_threshold,
                )?
                .map(|service| (service.name, service.price))
                .ok_or_else(|| {
                    WorkflowError::InvalidPayload(format!(
                        "no catalog price for lab test '{}'",
                        test_name
                    ))
                })?,
        };

        let result = LabResult::completed(&patient.id, &test_name, entry.result_value, cost);
        self.db.insert_lab_result(&result)?;
        effects.push(SideEffect::LabRecorded(result));

        if cost > 0 {
            let invoice = Invoice::unpaid(&patient.id, cost, test_name, ChargeSource::LabTest);
            self.db.insert_invoice(&invoice)?;
            effects.push(SideEffect::InvoiceRaised(invoice));
        }
        Ok(())
    }

    fn settle_outstanding(
        &self,
        patient: &Patient,
        payment_method: Option<&str>,
        effects: &mut Vec<SideEffect>,
    ) -> WorkflowResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        for invoice in self.db.list_unpaid_invoices_for_patient(&patient.id)? {
            if !self.db.mark_invoice_paid(&invoice.id, payment_method, &now)? {
                return Err(WorkflowError::ConflictingUpdate(invoice.id));
            }
            let settled = self
                .db
                .get_invoice(&invoice.id)?
                .ok_or_else(|| WorkflowError::InvoiceNotFound(invoice.id.clone()))?;
            effects.push(SideEffect::InvoiceSettled(settled));
        }
        Ok(())
    }
}

fn payload_mismatch(from: Department, to: Department, payload: &TransitionPayload) -> WorkflowError {
    WorkflowError::InvalidPayload(format!(
        "{} -> {} does not accept {}",
        from,
        to,
        payload.kind_name()
    ))
}
