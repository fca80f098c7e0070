//! Inventory models.

use serde::{Deserialize, Serialize};

/// A dispensable drug or supply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    /// UUID
    pub id: String,
    /// Display name (e.g., "Paracetamol 500mg")
    pub item_name: String,
    /// Dosage form / category (e.g., "Tablet", "Syrup", "Injection")
    pub category: String,
    /// Units on hand. Never negative.
    pub stock_quantity: i64,
    /// Price per unit in shillings
    pub unit_price: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Form data for a new inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub unit_price: i64,
}

impl InventoryItem {
    /// Create an item from form data.
    pub fn new(item: NewInventoryItem) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            item_name: item.item_name,
            category: item.category,
            stock_quantity: item.stock_quantity,
            unit_price: item.unit_price,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Check whether `quantity` units can be taken from stock.
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.stock_quantity
    }

    /// Charge for `quantity` units at the current unit price, or `None` if
    /// it does not fit in an `i64`.
    pub fn charge_for(&self, quantity: i64) -> Option<i64> {
        self.unit_price.checked_mul(quantity)
    }
}

/// Why a stock level changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdjustmentReason {
    /// Issued to a patient in the Pharmacy step
    Dispensed,
    /// New stock received
    Restock,
    /// Written off past expiry
    Expired,
    /// Written off as damaged or lost
    Damaged,
    /// Stock-take correction (either direction)
    Correction,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Dispensed => "dispensed",
            AdjustmentReason::Restock => "restock",
            AdjustmentReason::Expired => "expired",
            AdjustmentReason::Damaged => "damaged",
            AdjustmentReason::Correction => "correction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dispensed" => Some(AdjustmentReason::Dispensed),
            "restock" => Some(AdjustmentReason::Restock),
            "expired" => Some(AdjustmentReason::Expired),
            "damaged" => Some(AdjustmentReason::Damaged),
            "correction" => Some(AdjustmentReason::Correction),
            _ => None,
        }
    }
}

/// One row of the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    /// UUID
    pub id: String,
    /// Inventory item affected
    pub item_id: String,
    /// Signed change in units
    pub delta: i64,
    /// Reason code
    pub reason: AdjustmentReason,
    /// Stock level after the change
    pub resulting_quantity: i64,
    /// Recipient, for dispensing
    pub patient_id: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl StockMovement {
    pub fn new(
        item_id: impl Into<String>,
        delta: i64,
        reason: AdjustmentReason,
        resulting_quantity: i64,
        patient_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            item_id: item_id.into(),
            delta,
            reason,
            resulting_quantity,
            patient_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
