//! Service catalog database operations.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{ServiceCatalogEntry, ServiceKind};

impl Database {
    /// Insert or update a catalog entry (matched on kind + name, case-insensitive).
    pub fn upsert_service(&self, entry: &ServiceCatalogEntry) -> DbResult<()> {
        let updated = self.conn.execute(
            "UPDATE lab_services SET price = ?3 WHERE kind = ?1 AND name = ?2 COLLATE NOCASE",
            params![entry.kind.as_str(), entry.name, entry.price],
        )?;
        if updated == 0 {
            self.conn.execute(
                "INSERT INTO lab_services (id, name, price, kind) VALUES (?1, ?2, ?3, ?4)",
                params![entry.id, entry.name, entry.price, entry.kind.as_str()],
            )?;
        }
        Ok(())
    }

    /// List catalog entries of one kind, by name.
    pub fn list_services(&self, kind: ServiceKind) -> DbResult<Vec<ServiceCatalogEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, price, kind
            FROM lab_services
            WHERE kind = ?
            ORDER BY name COLLATE NOCASE
            "#,
        )?;

        let rows = stmt.query_map([kind.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, name, price, kind) = row?;
            let kind = ServiceKind::parse(&kind)
                .ok_or_else(|| DbError::Constraint(format!("Unknown service kind: {}", kind)))?;
            entries.push(ServiceCatalogEntry { id, name, price, kind });
        }
        Ok(entries)
    }

    /// Find the catalog entry a staff-typed name refers to.
    ///
    /// Exact (case-insensitive) matches win; otherwise the most similar name scoring
    /// at least `min_similarity` is returned.
    pub fn find_service_by_name(
        &self,
        kind: ServiceKind,
        name: &str,
        min_similarity: f64,
    ) -> DbResult<Option<ServiceCatalogEntry>> {
        let entries = self.list_services(kind)?;

        if let Some(exact) = entries.iter().find(|e| e.is_named(name)) {
            return Ok(Some(exact.clone()));
        }

        Ok(entries
            .into_iter()
            .map(|e| (e.similarity(name), e))
            .filter(|(score, _)| *score >= min_similarity)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, e)| e))
    }
}
