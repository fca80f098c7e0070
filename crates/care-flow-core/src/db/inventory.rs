//! Inventory and stock ledger database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{AdjustmentReason, InventoryItem, StockMovement};

const ITEM_COLUMNS: &str = r#"
    id, item_name, category, stock_quantity, unit_price, created_at, updated_at
"#;

impl Database {
    /// Insert a new inventory item.
    pub fn insert_inventory_item(&self, item: &InventoryItem) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO inventory (
                id, item_name, category, stock_quantity, unit_price, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                item.id,
                item.item_name,
                item.category,
                item.stock_quantity,
                item.unit_price,
                item.created_at,
                item.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an inventory item by ID.
    pub fn get_inventory_item(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM inventory WHERE id = ?", ITEM_COLUMNS),
                [id],
                item_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all inventory items by name.
    pub fn list_inventory_items(&self) -> DbResult<Vec<InventoryItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM inventory ORDER BY item_name", ITEM_COLUMNS))?;
        let rows = stmt.query_map([], item_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List items whose stock is at or below `threshold`, lowest first.
    pub fn list_low_stock_items(&self, threshold: i64) -> DbResult<Vec<InventoryItem>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM inventory
            WHERE stock_quantity <= ?
            ORDER BY stock_quantity, item_name
            "#,
            ITEM_COLUMNS
        ))?;
        let rows = stmt.query_map([threshold], item_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Take `quantity` units out of stock if at least that many remain.
    ///
    /// Check and decrement are one statement. Returns the new stock level, or
    /// `None` when the item is missing or stock is insufficient.
    pub fn decrement_stock(&self, id: &str, quantity: i64, at: &str) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                r#"
                UPDATE inventory SET
                    stock_quantity = stock_quantity - ?2,
                    updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                RETURNING stock_quantity
                "#,
                params![id, quantity, at],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Add `quantity` units to stock. Returns the new stock level, or `None` if missing.
    pub fn increment_stock(&self, id: &str, quantity: i64, at: &str) -> DbResult<Option<i64>> {
        self.conn
            .query_row(
                r#"
                UPDATE inventory SET
                    stock_quantity = stock_quantity + ?2,
                    updated_at = ?3
                WHERE id = ?1
                RETURNING stock_quantity
                "#,
                params![id, quantity, at],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Append a stock ledger row.
    pub fn insert_stock_movement(&self, movement: &StockMovement) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO stock_movements (
                id, item_id, delta, reason, resulting_quantity, patient_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                movement.id,
                movement.item_id,
                movement.delta,
                movement.reason.as_str(),
                movement.resulting_quantity,
                movement.patient_id,
                movement.created_at,
            ],
        )?;
        Ok(())
    }

    /// List the stock ledger for an item, oldest first.
    pub fn list_stock_movements(&self, item_id: &str) -> DbResult<Vec<StockMovement>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, item_id, delta, reason, resulting_quantity, patient_id, created_at
            FROM stock_movements
            WHERE item_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt.query_map([item_id], |row| {
            Ok(MovementRow {
                id: row.get(0)?,
                item_id: row.get(1)?,
                delta: row.get(2)?,
                reason: row.get(3)?,
                resulting_quantity: row.get(4)?,
                patient_id: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut movements = Vec::new();
        for row in rows {
            movements.push(row?.try_into()?);
        }
        Ok(movements)
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<InventoryItem> {
    Ok(InventoryItem {
        id: row.get(0)?,
        item_name: row.get(1)?,
        category: row.get(2)?,
        stock_quantity: row.get(3)?,
        unit_price: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Intermediate row struct for database mapping.
struct MovementRow {
    id: String,
    item_id: String,
    delta: i64,
    reason: String,
    resulting_quantity: i64,
    patient_id: Option<String>,
    created_at: String,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = DbError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let reason = AdjustmentReason::parse(&row.reason)
            .ok_or_else(|| DbError::Constraint(format!("Unknown adjustment reason: {}", row.reason)))?;

        Ok(StockMovement {
            id: row.id,
            item_id: row.item_id,
            delta: row.delta,
            reason,
            resulting_quantity: row.resulting_quantity,
            patient_id: row.patient_id,
            created_at: row.created_at,
        })
    }
}
