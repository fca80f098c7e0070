//! Runtime configuration for the workflow engine and record store.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    /// What to do when a patient with unpaid invoices is discharged
    pub discharge_policy: DischargePolicy,
    /// Record store settings
    pub store: StoreConfig,
    /// Pharmacy stock settings
    pub inventory: InventoryConfig,
    /// Service catalog lookup settings
    pub catalog: CatalogConfig,
}

/// Rule applied to discharges that bypass the Billing step.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DischargePolicy {
    /// Refuse to discharge while any invoice is unpaid
    #[default]
    BlockOutstanding,
    /// Discharge anyway and leave the invoices open
    AllowOutstanding,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// How long a connection waits for another writer's lock, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InventoryConfig {
    /// Items at or below this many units show up on the low-stock list
    pub low_stock_threshold: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Minimum similarity for a typed test name to pick up a catalog price
    pub fuzzy_match_threshold: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: 0.85,
        }
    }
}

impl WorkflowConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse workflow configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.inventory.low_stock_threshold < 0 {
            anyhow::bail!("inventory.low_stock_threshold must not be negative");
        }
        if !(0.0..=1.0).contains(&self.catalog.fuzzy_match_threshold) {
            anyhow::bail!("catalog.fuzzy_match_threshold must be between 0.0 and 1.0");
        }
        Ok(())
    }
}
