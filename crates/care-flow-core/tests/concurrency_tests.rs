//! Several connections racing on the same database file.

use std::sync::{Arc, Barrier};
use std::thread;

use care_flow_core::config::{StoreConfig, WorkflowConfig};
use care_flow_core::db::Database;
use care_flow_core::models::{Department, NewInventoryItem, NewPatient};
use care_flow_core::workflow::{TransitionPayload, Workflow, WorkflowError};

fn store_config() -> StoreConfig {
    StoreConfig {
        busy_timeout_ms: 30_000,
    }
}

#[test]
fn test_parallel_dispense_never_oversells() {
    const STOCK: i64 = 5;
    const THREADS: usize = 12;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let setup = Database::open_with(&path, &store_config()).unwrap();
    let workflow = Workflow::with_defaults(&setup);
    let item = workflow
        .add_inventory_item(NewInventoryItem {
            item_name: "Amoxicillin 250mg".into(),
            category: "Capsule".into(),
            stock_quantity: STOCK,
            unit_price: 1500,
        })
        .unwrap();

    let mut patients = Vec::new();
    for i in 0..THREADS {
        let patient = workflow
            .register_patient(NewPatient::named(format!("Patient {}", i)))
            .unwrap();
        for dept in [Department::Consultation, Department::Pharmacy] {
            workflow
                .advance(&patient.id, dept, TransitionPayload::None)
                .unwrap();
        }
        patients.push(patient.id);
    }

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = patients
        .into_iter()
        .map(|patient_id| {
            let db = Database::open_with(&path, &store_config()).unwrap();
            let barrier = Arc::clone(&barrier);
            let item_id = item.id.clone();
            thread::spawn(move || {
                let workflow = Workflow::new(&db, &WorkflowConfig::default());
                barrier.wait();
                workflow.dispense(&patient_id, &item_id, 1)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let shortages = results
        .iter()
        .filter(|r| matches!(r, Err(WorkflowError::InsufficientStock { .. })))
        .count();

    assert_eq!(successes, STOCK as usize);
    assert_eq!(shortages, THREADS - STOCK as usize);
    assert_eq!(setup.get_inventory_item(&item.id).unwrap().unwrap().stock_quantity, 0);
    assert_eq!(setup.list_unpaid_invoices().unwrap().len(), STOCK as usize);
    assert_eq!(
        workflow.queues().patients_in(Department::Billing).unwrap().len(),
        STOCK as usize
    );
    assert_eq!(
        workflow.queues().patients_in(Department::Pharmacy).unwrap().len(),
        THREADS - STOCK as usize
    );
}

#[test]
fn test_racing_advances_on_one_patient() {
    const THREADS: usize = 8;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let setup = Database::open_with(&path, &store_config()).unwrap();
    let patient = Workflow::with_defaults(&setup)
        .register_patient(NewPatient::named("Halima Omari"))
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Database::open_with(&path, &store_config()).unwrap();
            let barrier = Arc::clone(&barrier);
            let patient_id = patient.id.clone();
            thread::spawn(move || {
                let workflow = Workflow::with_defaults(&db);
                barrier.wait();
                workflow.advance(&patient_id, Department::Consultation, TransitionPayload::None)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(WorkflowError::InvalidTransition { .. }) | Err(WorkflowError::ConflictingUpdate(_))
    )));
    assert_eq!(
        setup.get_patient(&patient.id).unwrap().unwrap().current_department,
        Department::Consultation
    );
}

#[test]
fn test_racing_payments_on_one_invoice() {
    const THREADS: usize = 6;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let setup = Database::open_with(&path, &store_config()).unwrap();
    let workflow = Workflow::with_defaults(&setup);
    let patient = workflow.register_patient(NewPatient::named("Halima Omari")).unwrap();
    let invoice = workflow.raise_invoice(&patient.id, 2000, "Consultation Fee").unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Database::open_with(&path, &store_config()).unwrap();
            let barrier = Arc::clone(&barrier);
            let invoice_id = invoice.id.clone();
            thread::spawn(move || {
                let workflow = Workflow::with_defaults(&db);
                barrier.wait();
                workflow.confirm_payment(&invoice_id, Some("cash"))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(WorkflowError::AlreadyPaid(_))))
            .count(),
        THREADS - 1
    );
}
