//! Inventory identifiers and the serial-number value object.

use serde::{Deserialize, Serialize};

use snerp_core::{AggregateId, DomainError, DomainResult, ValueObject};

/// Inventory item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryItemId(pub AggregateId);

impl InventoryItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for InventoryItemId {}

/// Warehouse identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(pub AggregateId);

impl WarehouseId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::str::FromStr for WarehouseId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<AggregateId>().map(Self)
    }
}

impl core::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for WarehouseId {}

const SN_MIN_LEN: usize = 5;
const SN_MAX_LEN: usize = 50;

/// Serial number of one physical unit.
///
/// Normalized to uppercase with surrounding whitespace removed; 5 to 50
/// characters from `[A-Z0-9-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnCode(String);

impl SnCode {
    pub fn of(value: &str) -> DomainResult<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("sn code cannot be blank"));
        }

        let len = normalized.chars().count();
        if !(SN_MIN_LEN..=SN_MAX_LEN).contains(&len) {
            return Err(DomainError::validation(format!(
                "sn code length must be between {SN_MIN_LEN} and {SN_MAX_LEN}, got {len}"
            )));
        }

        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::validation(format!(
                "sn code may only contain A-Z, 0-9 and '-', got '{normalized}'"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SnCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<SnCode> for String {
    fn from(value: SnCode) -> Self {
        value.0
    }
}

impl core::fmt::Display for SnCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for SnCode {}
