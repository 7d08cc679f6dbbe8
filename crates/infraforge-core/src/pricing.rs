//! Static pricing table
//!
//! Unit prices in USD for the component kinds the cost estimator knows.
//! The table is plain data: it is built once (from the defaults below or
//! from the `pricing` section of `infraforge.yaml`) and handed to the
//! estimator, which never mutates it.
//!
//! # Overrides
//!
//! ```yaml
//! pricing:
//!   load_balancer_hourly: 0.025
//!   instance_hourly:
//!     t3.medium: 0.05
//!     t3.large: 0.10
//! ```
//!
//! A map given in configuration replaces the default map as a whole.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::resources::{DEFAULT_DB_INSTANCE_CLASS, DEFAULT_INSTANCE_TYPE};

/// Unit prices used by [`crate::CostEstimator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    /// Hours used to turn hourly rates into monthly amounts
    pub hours_per_month: Decimal,

    /// Hourly rate per compute instance type
    pub instance_hourly: BTreeMap<String, Decimal>,

    /// Hourly rate per database instance class
    pub db_instance_hourly: BTreeMap<String, Decimal>,

    /// Monthly rate per GB of allocated database storage
    pub db_storage_gb_monthly: Decimal,

    /// Hourly rate of an application load balancer
    pub load_balancer_hourly: Decimal,

    /// Hourly rate of a NAT gateway
    pub nat_gateway_hourly: Decimal,

    /// Monthly rate per GB of object storage
    pub object_storage_gb_monthly: Decimal,

    /// Stored GB assumed for every bucket
    pub object_storage_estimated_gb: Decimal,
}

impl Default for PricingTable {
    fn default() -> Self {
        let instance_hourly = [
            ("t3.micro", dec!(0.0104)),
            ("t3.small", dec!(0.0208)),
            ("t3.medium", dec!(0.0416)),
            ("t3.large", dec!(0.0832)),
            ("t3.xlarge", dec!(0.1664)),
        ];
        let db_instance_hourly = [
            ("db.t3.micro", dec!(0.017)),
            ("db.t3.small", dec!(0.034)),
            ("db.t3.medium", dec!(0.068)),
            ("db.t3.large", dec!(0.136)),
        ];

        Self {
            hours_per_month: dec!(730),
            instance_hourly: instance_hourly
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            db_instance_hourly: db_instance_hourly
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            db_storage_gb_monthly: dec!(0.115),
            load_balancer_hourly: dec!(0.0225),
            nat_gateway_hourly: dec!(0.045),
            object_storage_gb_monthly: dec!(0.023),
            object_storage_estimated_gb: dec!(100),
        }
    }
}

impl PricingTable {
    /// Hourly rate for a compute instance type
    ///
    /// Unknown types are priced at the medium-tier rate.
    pub fn instance_rate(&self, instance_type: &str) -> Decimal {
        lookup_or_tier_default(&self.instance_hourly, instance_type, DEFAULT_INSTANCE_TYPE)
    }

    /// Hourly rate for a database instance class
    ///
    /// Unknown classes are priced at the medium-tier rate.
    pub fn db_instance_rate(&self, instance_class: &str) -> Decimal {
        lookup_or_tier_default(
            &self.db_instance_hourly,
            instance_class,
            DEFAULT_DB_INSTANCE_CLASS,
        )
    }
}

fn lookup_or_tier_default(rates: &BTreeMap<String, Decimal>, key: &str, fallback: &str) -> Decimal {
    rates
        .get(key)
        .or_else(|| rates.get(fallback))
        .copied()
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_instance_rate() {
        let table = PricingTable::default();
        assert_eq!(table.instance_rate("t3.large"), dec!(0.0832));
        assert_eq!(table.db_instance_rate("db.t3.micro"), dec!(0.017));
    }

    #[test]
    fn test_unknown_instance_falls_back_to_medium() {
        let table = PricingTable::default();
        assert_eq!(table.instance_rate("m7g.metal"), dec!(0.0416));
        assert_eq!(table.db_instance_rate("db.r6g.large"), dec!(0.068));
    }

    #[test]
    fn test_partial_override_from_yaml() {
        let yaml = r#"
load_balancer_hourly: 0.03
instance_hourly:
  t3.medium: 0.05
"#;
        let table: PricingTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.load_balancer_hourly, dec!(0.03));
        assert_eq!(table.instance_rate("t3.medium"), dec!(0.05));
        // replaced map: other sizes now fall back to the overridden medium rate
        assert_eq!(table.instance_rate("t3.large"), dec!(0.05));
        assert_eq!(table.hours_per_month, dec!(730));
    }

    #[test]
    fn test_empty_rate_map_prices_zero() {
        let table = PricingTable {
            instance_hourly: BTreeMap::new(),
            ..Default::default()
        };
        assert_eq!(table.instance_rate("t3.medium"), Decimal::ZERO);
    }
}
