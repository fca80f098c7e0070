//! Lab result, consultation and vitals database operations (append-only).

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::{Consultation, LabResult, NewVitals, Vitals};

impl Database {
    /// Insert a lab result.
    pub fn insert_lab_result(&self, result: &LabResult) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO lab_results (
                id, patient_id, test_name, result_value, cost, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                result.id,
                result.patient_id,
                result.test_name,
                result.result_value,
                result.cost,
                result.status,
                result.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's lab results, newest first.
    pub fn list_lab_results_for_patient(&self, patient_id: &str) -> DbResult<Vec<LabResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, test_name, result_value, cost, status, created_at
            FROM lab_results
            WHERE patient_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(LabResult {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                test_name: row.get(2)?,
                result_value: row.get(3)?,
                cost: row.get(4)?,
                status: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a consultation note.
    pub fn insert_consultation(&self, consultation: &Consultation) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO consultations (
                id, patient_id, chief_complaint, diagnosis, prescription, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                consultation.id,
                consultation.patient_id,
                consultation.chief_complaint,
                consultation.diagnosis,
                consultation.prescription,
                consultation.notes,
                consultation.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's consultation history, newest first.
    pub fn list_consultations_for_patient(&self, patient_id: &str) -> DbResult<Vec<Consultation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, chief_complaint, diagnosis, prescription, notes, created_at
            FROM consultations
            WHERE patient_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(Consultation {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                chief_complaint: row.get(2)?,
                diagnosis: row.get(3)?,
                prescription: row.get(4)?,
                notes: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Insert a set of vitals.
    pub fn insert_vitals(&self, vitals: &Vitals) -> DbResult<()> {
        let r = &vitals.readings;
        self.conn.execute(
            r#"
            INSERT INTO vitals (
                id, patient_id, systolic, diastolic, heart_rate, temperature, weight, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                vitals.id,
                vitals.patient_id,
                r.systolic,
                r.diastolic,
                r.heart_rate,
                r.temperature,
                r.weight,
                vitals.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's vitals, newest first.
    pub fn list_vitals_for_patient(&self, patient_id: &str) -> DbResult<Vec<Vitals>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, systolic, diastolic, heart_rate, temperature, weight, created_at
            FROM vitals
            WHERE patient_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(Vitals {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                readings: NewVitals {
                    systolic: row.get(2)?,
                    diastolic: row.get(3)?,
                    heart_rate: row.get(4)?,
                    temperature: row.get(5)?,
                    weight: row.get(6)?,
                },
                created_at: row.get(7)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsultationNote, NewPatient, Patient};

    fn setup_db() -> (Database, Patient) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::admit(NewPatient::named("Amina Juma"));
        db.insert_patient(&patient).unwrap();
        (db, patient)
    }

    #[test]
    fn test_lab_results_roundtrip() {
        let (db, patient) = setup_db();

        let mut older = LabResult::completed(&patient.id, "Malaria mRDT", "Negative", 5000);
        older.created_at = "2024-01-15T08:00:00+00:00".into();
        let mut newer = LabResult::completed(&patient.id, "Full Blood Picture", "Normal", 8000);
        newer.created_at = "2024-01-15T10:00:00+00:00".into();

        db.insert_lab_result(&older).unwrap();
        db.insert_lab_result(&newer).unwrap();

        let results = db.list_lab_results_for_patient(&patient.id).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].test_name, "Full Blood Picture");
        assert_eq!(results[1].cost, 5000);
    }

    #[test]
    fn test_lab_result_requires_patient() {
        let (db, _) = setup_db();
        let orphan = LabResult::completed("ghost", "Malaria mRDT", "", 5000);
        assert!(db.insert_lab_result(&orphan).is_err());
    }

    #[test]
    fn test_consultations_roundtrip() {
        let (db, patient) = setup_db();

        let note = ConsultationNote {
            chief_complaint: "Fever for three days".into(),
            diagnosis: Some("Malaria PF+".into()),
            prescription: Some("ALu 80/480".into()),
            notes: None,
        };
        db.insert_consultation(&Consultation::from_note(&patient.id, note))
            .unwrap();

        let history = db.list_consultations_for_patient(&patient.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].chief_complaint, "Fever for three days");
        assert_eq!(history[0].prescription.as_deref(), Some("ALu 80/480"));
    }

    #[test]
    fn test_vitals_roundtrip() {
        let (db, patient) = setup_db();

        let mut older = Vitals::taken(
            &patient.id,
            NewVitals {
                weight: Some(61.5),
                ..Default::default()
            },
        );
        older.created_at = "2024-01-15T08:00:00+00:00".into();
        let mut newer = Vitals::taken(
            &patient.id,
            NewVitals {
                systolic: Some(128),
                diastolic: Some(84),
                heart_rate: Some(92),
                temperature: Some(38.4),
                weight: None,
            },
        );
        newer.created_at = "2024-01-15T10:00:00+00:00".into();

        db.insert_vitals(&older).unwrap();
        db.insert_vitals(&newer).unwrap();

        let history = db.list_vitals_for_patient(&patient.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].readings.temperature, Some(38.4));
        assert_eq!(history[0].readings.weight, None);
        assert_eq!(history[1].readings.weight, Some(61.5));
        assert_eq!(history[1].readings.systolic, None);
    }

    #[test]
    fn test_vitals_reject_nonpositive_readings() {
        let (db, patient) = setup_db();
        let bad = Vitals::taken(
            &patient.id,
            NewVitals {
                heart_rate: Some(0),
                ..Default::default()
            },
        );
        assert!(db.insert_vitals(&bad).is_err());
        assert!(db.list_vitals_for_patient(&patient.id).unwrap().is_empty());
    }
}
