//! Indirect-cost allocation.
//!
//! The month's overhead records are summed by cost name into pool entries; active
//! cost distribution configs send a percentage of each named entry to a product
//! category. The split itself is the shared proportional allocation.

use super::{
    allocation::{self, Allocation, AllocationTarget, CostPool, DistributionRule, PoolSet},
    volume::VolumeSignal,
    warning::PoolKind,
};
use crate::entities::{cost_distribution_config, indirect_cost_record};
use std::collections::BTreeMap;

/// Builds the indirect pool entries and rules from the month's rows.
///
/// Records sharing a cost name are summed into one entry. Inactive configs are
/// dropped; the remaining rules keep config id order.
#[must_use]
pub fn pool_set(
    records: &[indirect_cost_record::Model],
    configs: &[cost_distribution_config::Model],
) -> PoolSet {
    let mut amounts: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *amounts.entry(record.cost_name.as_str()).or_insert(0.0) += record.amount;
    }

    let pools = amounts
        .into_iter()
        .map(|(name, amount)| CostPool {
            key: name.to_string(),
            label: name.to_string(),
            amount,
        })
        .collect();

    let mut active: Vec<&cost_distribution_config::Model> =
        configs.iter().filter(|c| c.is_active).collect();
    active.sort_by_key(|c| c.id);

    let rules = active
        .into_iter()
        .map(|config| DistributionRule {
            pool_key: config.cost_name.clone(),
            category_id: config.product_category_id,
            percentage: config.percentage,
        })
        .collect();

    PoolSet { pools, rules }
}

/// Spreads the indirect pool over the products.
#[must_use]
pub fn allocate(
    pool_set: &PoolSet,
    targets: &[AllocationTarget],
    volumes: &VolumeSignal,
) -> Allocation {
    allocation::allocate(PoolKind::Indirect, pool_set, targets, volumes)
}
