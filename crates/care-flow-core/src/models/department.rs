//! Department (pipeline stage) model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A stage in the patient pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Department {
    /// Intake desk, where every patient starts
    Reception,
    /// Doctor's room
    Consultation,
    /// Investigations (tests ordered by the doctor)
    Laboratory,
    /// Drug dispensing
    Pharmacy,
    /// Cashier
    Billing,
    /// Terminal state
    Discharged,
}

impl Department {
    /// Every department, in pipeline order.
    pub const ALL: [Department; 6] = [
        Department::Reception,
        Department::Consultation,
        Department::Laboratory,
        Department::Pharmacy,
        Department::Billing,
        Department::Discharged,
    ];

    /// Storage/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Reception => "Reception",
            Department::Consultation => "Consultation",
            Department::Laboratory => "Laboratory",
            Department::Pharmacy => "Pharmacy",
            Department::Billing => "Billing",
            Department::Discharged => "Discharged",
        }
    }

    /// Check if this is the terminal department.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Department::Discharged)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown department name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown department: {0}")]
pub struct UnknownDepartment(pub String);

impl FromStr for Department {
    type Err = UnknownDepartment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDepartment(s.to_string()))
    }
}
