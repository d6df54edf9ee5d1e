//! Configuration for the application services.
//!
//! Values come from the process environment; every key is optional and falls
//! back to [`ServiceConfig::default`].

use thiserror::Error;

use snerp_inventory::WarehouseId;

pub const ENV_MAX_CONFLICT_RETRIES: &str = "SNERP_MAX_CONFLICT_RETRIES";
pub const ENV_RECEIVING_WAREHOUSE_ID: &str = "SNERP_RECEIVING_WAREHOUSE_ID";

const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How many times a use case is reloaded and re-run after an optimistic
    /// concurrency conflict on save.
    pub max_conflict_retries: u32,
    /// Warehouse that receives stock created from completed purchase orders.
    pub receiving_warehouse: Option<WarehouseId>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            receiving_warehouse: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_blank(lookup(ENV_MAX_CONFLICT_RETRIES)) {
            config.max_conflict_retries =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: ENV_MAX_CONFLICT_RETRIES,
                        value: raw.clone(),
                        reason: e.to_string(),
                    })?;
        }

        if let Some(raw) = non_blank(lookup(ENV_RECEIVING_WAREHOUSE_ID)) {
            let warehouse = raw
                .parse::<WarehouseId>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: ENV_RECEIVING_WAREHOUSE_ID,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            config.receiving_warehouse = Some(warehouse);
        }

        Ok(config)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use snerp_core::AggregateId;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.max_conflict_retries, 3);
        assert_eq!(config.receiving_warehouse, None);
    }

    #[test]
    fn reads_all_keys() {
        let warehouse = AggregateId::new();
        let raw = warehouse.to_string();
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_MAX_CONFLICT_RETRIES, "5"),
            (ENV_RECEIVING_WAREHOUSE_ID, raw.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.max_conflict_retries, 5);
        assert_eq!(config.receiving_warehouse, Some(WarehouseId::new(warehouse)));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            ServiceConfig::from_lookup(lookup(&[(ENV_MAX_CONFLICT_RETRIES, "  ")])).unwrap();
        assert_eq!(config.max_conflict_retries, 3);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_MAX_CONFLICT_RETRIES, "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_MAX_CONFLICT_RETRIES, .. }));

        let err = ServiceConfig::from_lookup(lookup(&[(ENV_RECEIVING_WAREHOUSE_ID, "wh-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_RECEIVING_WAREHOUSE_ID, .. }));
    }
}
