//! Pharmacy: dispensing against stock, and stock maintenance.

use tracing::{info, warn};

use super::transition::{DispenseRequest, SideEffect, TransitionOutcome, TransitionPayload};
use super::{Workflow, WorkflowError, WorkflowResult};
use crate::models::{
    AdjustmentReason, ChargeSource, Department, InventoryItem, Invoice, NewInventoryItem, Patient,
    StockMovement,
};

impl<'a> Workflow<'a> {
    /// Issue `quantity` units of an item to a patient in the Pharmacy and send
    /// them on to Billing.
    ///
    /// Same as `advance(patient_id, Billing, Dispense { item_id, quantity })`.
    pub fn dispense(
        &self,
        patient_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> WorkflowResult<TransitionOutcome> {
        self.advance(
            patient_id,
            Department::Billing,
            TransitionPayload::Dispense(DispenseRequest {
                item_id: item_id.to_string(),
                quantity,
            }),
        )
    }

    /// Stock and billing side of a dispense. Runs inside the caller's transaction.
    pub(super) fn dispense_within(
        &self,
        patient: &Patient,
        request: &DispenseRequest,
        effects: &mut Vec<SideEffect>,
    ) -> WorkflowResult<()> {
        if request.quantity < 1 {
            return Err(WorkflowError::InvalidPayload(format!(
                "dispense quantity must be at least 1, got {}",
                request.quantity
            )));
        }

        let item = self.load_item(&request.item_id)?;
        if !item.can_supply(request.quantity) {
            return Err(insufficient(&item, request.quantity));
        }
        let charge = item.charge_for(request.quantity).ok_or_else(|| {
            WorkflowError::InvalidPayload(format!(
                "charge for {} x{} is out of range",
                item.item_name, request.quantity
            ))
        })?;

        let now = chrono::Utc::now().to_rfc3339();
        let remaining = self
            .db
            .decrement_stock(&item.id, request.quantity, &now)?
            .ok_or_else(|| insufficient(&item, request.quantity))?;

        let movement = StockMovement::new(
            &item.id,
            -request.quantity,
            AdjustmentReason::Dispensed,
            remaining,
            Some(patient.id.clone()),
        );
        self.db.insert_stock_movement(&movement)?;
        effects.push(SideEffect::StockDispensed(movement));

        if charge > 0 {
            let invoice = Invoice::unpaid(
                &patient.id,
                charge,
                format!("{} x{}", item.item_name, request.quantity),
                ChargeSource::Dispensing,
            );
            self.db.insert_invoice(&invoice)?;
            effects.push(SideEffect::InvoiceRaised(invoice));
        }

        if remaining <= self.config.inventory.low_stock_threshold {
            warn!(item_id = %item.id, item = %item.item_name, remaining, "stock running low");
        }
        Ok(())
    }

    /// Add a new item to the pharmacy inventory.
    pub fn add_inventory_item(&self, item: NewInventoryItem) -> WorkflowResult<InventoryItem> {
        if item.item_name.trim().is_empty() {
            return Err(WorkflowError::InvalidPayload("item name is required".into()));
        }
        if item.stock_quantity < 0 {
            return Err(WorkflowError::InvalidPayload(format!(
                "initial stock must not be negative, got {}",
                item.stock_quantity
            )));
        }
        if item.unit_price < 0 {
            return Err(WorkflowError::InvalidPayload(format!(
                "unit price must not be negative, got {}",
                item.unit_price
            )));
        }

        let item = InventoryItem::new(NewInventoryItem {
            item_name: item.item_name.trim().to_string(),
            ..item
        });

        let tx = self.db.write_transaction()?;
        self.db.insert_inventory_item(&item)?;
        if item.stock_quantity > 0 {
            self.db.insert_stock_movement(&StockMovement::new(
                &item.id,
                item.stock_quantity,
                AdjustmentReason::Restock,
                item.stock_quantity,
                None,
            ))?;
        }
        tx.commit()?;

        info!(item_id = %item.id, item = %item.item_name, stock = item.stock_quantity, "inventory item added");
        Ok(item)
    }

    /// Change an item's stock outside of dispensing (deliveries, write-offs,
    /// stock-take corrections). Every adjustment is written to the stock ledger.
    pub fn adjust_stock(
        &self,
        item_id: &str,
        delta: i64,
        reason: AdjustmentReason,
    ) -> WorkflowResult<StockMovement> {
        validate_adjustment(delta, reason)?;

        let tx = self.db.write_transaction()?;
        let item = self.load_item(item_id)?;

        let now = chrono::Utc::now().to_rfc3339();
        let resulting = if delta > 0 {
            if item.stock_quantity.checked_add(delta).is_none() {
                return Err(out_of_range(delta));
            }
            self.db
                .increment_stock(item_id, delta, &now)?
                .ok_or_else(|| WorkflowError::ItemNotFound(item_id.to_string()))?
        } else {
            let removed = delta.checked_neg().ok_or_else(|| out_of_range(delta))?;
            self.db
                .decrement_stock(item_id, removed, &now)?
                .ok_or_else(|| insufficient(&item, removed))?
        };

        let movement = StockMovement::new(item_id, delta, reason, resulting, None);
        self.db.insert_stock_movement(&movement)?;
        tx.commit()?;

        info!(
            item_id,
            delta,
            reason = reason.as_str(),
            resulting,
            "stock adjusted"
        );
        Ok(movement)
    }

    fn load_item(&self, item_id: &str) -> WorkflowResult<InventoryItem> {
        self.db
            .get_inventory_item(item_id)?
            .ok_or_else(|| WorkflowError::ItemNotFound(item_id.to_string()))
    }
}

fn validate_adjustment(delta: i64, reason: AdjustmentReason) -> WorkflowResult<()> {
    let problem = match reason {
        _ if delta == 0 => Some("stock adjustment must change the quantity"),
        AdjustmentReason::Dispensed => Some("dispensing goes through the pharmacy transition"),
        AdjustmentReason::Restock if delta < 0 => Some("a restock must add stock"),
        AdjustmentReason::Expired | AdjustmentReason::Damaged if delta > 0 => {
            Some("a write-off must remove stock")
        }
        _ => None,
    };

    match problem {
        Some(msg) => Err(WorkflowError::InvalidPayload(msg.into())),
        None => Ok(()),
    }
}

fn out_of_range(delta: i64) -> WorkflowError {
    WorkflowError::InvalidPayload(format!("stock adjustment {} is out of range", delta))
}

fn insufficient(item: &InventoryItem, requested: i64) -> WorkflowError {
    WorkflowError::InsufficientStock {
        item_id: item.id.clone(),
        requested,
        available: item.stock_quantity,
    }
}
