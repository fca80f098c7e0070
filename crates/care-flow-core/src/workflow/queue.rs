//! Department queues, read straight from the record store.

use crate::db::{Database, DbResult};
use crate::models::{Department, InventoryItem, Invoice, Patient};

/// Read-only worklists for each station.
pub struct QueueView<'a> {
    db: &'a Database,
}

impl<'a> QueueView<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Patients waiting in a department, first come first served.
    pub fn patients_in(&self, department: Department) -> DbResult<Vec<Patient>> {
        self.db.list_patients_in_department(department)
    }

    /// Head count for every department, in pipeline order. Empty departments report 0.
    pub fn queue_lengths(&self) -> DbResult<Vec<(Department, usize)>> {
        let counts = self.db.count_patients_by_department()?;
        Ok(Department::ALL
            .iter()
            .map(|dept| {
                let count = counts
                    .iter()
                    .find(|(d, _)| d == dept)
                    .map(|(_, n)| *n)
                    .unwrap_or(0);
                (*dept, count)
            })
            .collect())
    }

    /// Items at or below `threshold` units.
    pub fn low_stock(&self, threshold: i64) -> DbResult<Vec<InventoryItem>> {
        self.db.list_low_stock_items(threshold)
    }

    /// Every unpaid invoice, oldest first.
    pub fn unpaid_invoices(&self) -> DbResult<Vec<Invoice>> {
        self.db.list_unpaid_invoices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewInventoryItem, NewPatient};
    use crate::workflow::{TransitionPayload, Workflow};

    #[test]
    fn test_queue_is_fifo_and_read_after_write() {
        let db = Database::open_in_memory().unwrap();
        let workflow = Workflow::with_defaults(&db);
        let queues = workflow.queues();

        let first = workflow.register_patient(NewPatient::named("Asha")).unwrap();
        let second = workflow.register_patient(NewPatient::named("Juma")).unwrap();

        let waiting: Vec<_> = queues
            .patients_in(Department::Reception)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(waiting, vec![first.id.clone(), second.id.clone()]);

        workflow
            .advance(&first.id, Department::Consultation, TransitionPayload::None)
            .unwrap();

        let reception = queues.patients_in(Department::Reception).unwrap();
        assert_eq!(reception.len(), 1);
        assert_eq!(reception[0].id, second.id);
        assert_eq!(queues.patients_in(Department::Consultation).unwrap()[0].id, first.id);
    }

    #[test]
    fn test_queue_lengths_cover_every_department() {
        let db = Database::open_in_memory().unwrap();
        let workflow = Workflow::with_defaults(&db);
        workflow.register_patient(NewPatient::named("Asha")).unwrap();
        workflow.register_patient(NewPatient::named("Juma")).unwrap();

        let lengths = workflow.queues().queue_lengths().unwrap();
        assert_eq!(lengths.len(), Department::ALL.len());
        assert_eq!(lengths[0], (Department::Reception, 2));
        assert!(lengths[1..].iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_low_stock() {
        let db = Database::open_in_memory().unwrap();
        let workflow = Workflow::with_defaults(&db);
        for (name, stock) in [("ORS Sachet", 4), ("Paracetamol 500mg", 120), ("Zinc 20mg", 10)] {
            workflow
                .add_inventory_item(NewInventoryItem {
                    item_name: name.into(),
                    category: "Tablet".into(),
                    stock_quantity: stock,
                    unit_price: 100,
                })
                .unwrap();
        }

        let names: Vec<_> = workflow
            .queues()
            .low_stock(workflow.config().inventory.low_stock_threshold)
            .unwrap()
            .into_iter()
            .map(|i| i.item_name)
            .collect();
        assert_eq!(names, vec!["ORS Sachet", "Zinc 20mg"]);
    }

    #[test]
    fn test_unpaid_invoices() {
        let db = Database::open_in_memory().unwrap();
        let workflow = Workflow::with_defaults(&db);
        let patient = workflow.register_patient(NewPatient::named("Asha")).unwrap();
        let fee = workflow.raise_invoice(&patient.id, 2000, "Consultation Fee").unwrap();
        workflow.raise_invoice(&patient.id, 300, "Syringe").unwrap();
        workflow.confirm_payment(&fee.id, Some("cash")).unwrap();

        let unpaid = workflow.queues().unpaid_invoices().unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].amount, 300);
    }
}
