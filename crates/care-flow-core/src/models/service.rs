//! Service catalog models (reference price list).

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

/// Kind of priced service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceKind {
    /// Laboratory investigation
    LabTest,
    /// Drug template
    Drug,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::LabTest => "lab_test",
            ServiceKind::Drug => "drug",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lab_test" => Some(ServiceKind::LabTest),
            "drug" => Some(ServiceKind::Drug),
            _ => None,
        }
    }
}

/// A single entry in the service price list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCatalogEntry {
    /// UUID
    pub id: String,
    /// Service name (e.g., "Malaria mRDT", "Full Blood Picture")
    pub name: String,
    /// Current price in shillings
    pub price: i64,
    /// Lab test or drug
    pub kind: ServiceKind,
}

impl ServiceCatalogEntry {
    pub fn new(name: impl Into<String>, price: i64, kind: ServiceKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            kind,
        }
    }

    /// Check for a case-insensitive exact name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// Similarity of `query` to this entry's name (0.0 - 1.0).
    pub fn similarity(&self, query: &str) -> f64 {
        let a = self.name.trim().to_lowercase();
        let b = query.trim().to_lowercase();
        // Jaro-Winkler favours shared prefixes, which is how staff abbreviate test names
        jaro_winkler(&a, &b) * 0.6 + normalized_levenshtein(&a, &b) * 0.4
    }
}
