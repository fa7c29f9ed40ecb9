//! Proportional allocation of shared monthly cost pools.
//!
//! Both the indirect-cost pool and the employee-cost pool are spread across
//! products the same way:
//!
//! 1. Each distribution rule sends `percentage`% of one pool entry to a product
//!    category. A category's pool is the sum over its rules.
//! 2. Within a category, each product takes a share proportional to its volume
//!    for the month. When the category recorded no volume at all, every product
//!    takes `1 / N`, so the category pool is always fully distributed.
//! 3. The per-unit cost is the product's share divided by its own volume, or 0 when
//!    the product moved no units.
//!
//! Everything here is pure: callers load the pools, rules and volumes first.

use super::{
    volume::VolumeSignal,
    warning::{AllocationWarning, PoolKind},
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// A named monthly amount to be spread across product categories.
#[derive(Debug, Clone, PartialEq)]
pub struct CostPool {
    /// Key matched by [`DistributionRule::pool_key`]
    pub key: String,
    /// Name shown in breakdowns
    pub label: String,
    pub amount: f64,
}

/// Sends a percentage of one pool entry to one product category.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRule {
    pub pool_key: String,
    pub category_id: i64,
    /// 0-100
    pub percentage: f64,
}

/// A product taking part in the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationTarget {
    pub product_id: i64,
    pub category_id: i64,
}

/// Pools and rules for one kind of shared cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolSet {
    pub pools: Vec<CostPool>,
    pub rules: Vec<DistributionRule>,
}

impl PoolSet {
    /// Sum of every pool entry, whether or not a rule distributes it.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.pools.iter().map(|p| p.amount).sum()
    }
}

/// One pool entry's contribution to a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolContribution {
    /// Pool entry name (cost item or employee category)
    pub pool_name: String,
    /// Full monthly amount of the pool entry
    pub base_amount: f64,
    /// Percentage of the entry sent to the product's category
    pub percentage: f64,
    /// `base_amount * percentage / 100`
    pub category_amount: f64,
    /// The product's part of `category_amount`
    pub assigned_amount: f64,
}

/// How a product's share of its category pool was derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionInfo {
    pub product_volume: f64,
    pub category_total_volume: f64,
    pub products_in_category: usize,
    /// Fraction of the category pool assigned to the product
    pub ratio: f64,
    /// `ratio` expressed as a percentage
    pub percentage_of_category: f64,
    /// False when the equal split was used
    pub has_real_data: bool,
    pub data_source: String,
}

/// Result of the allocation for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductAllocation {
    /// Share of the pool divided by the product's volume
    pub per_unit: f64,
    /// Share of the pool assigned to the product for the month
    pub total_assigned: f64,
    pub breakdown: Vec<PoolContribution>,
    pub distribution: Option<DistributionInfo>,
    #[serde(skip)]
    pub warnings: Vec<AllocationWarning>,
}

impl ProductAllocation {
    fn unallocated(warning: AllocationWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }
}

/// A category's slice of the pools, before it is split among products.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPool {
    pub category_id: i64,
    pub amount: f64,
    contributions: Vec<CategoryContribution>,
}

#[derive(Debug, Clone, PartialEq)]
struct CategoryContribution {
    pool_name: String,
    base_amount: f64,
    percentage: f64,
    category_amount: f64,
}

/// Allocation of one pool kind across all products of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub kind: PoolKind,
    /// Sum of the pool entries for the month
    pub pool_total: f64,
    /// Sum of the shares actually handed to products
    pub distributed_total: f64,
    products: BTreeMap<i64, ProductAllocation>,
}

impl Allocation {
    /// Allocation for a product; products outside the run get nothing.
    #[must_use]
    pub fn for_product(&self, product_id: i64) -> ProductAllocation {
        self.products.get(&product_id).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Sums each category's weighted share of the pool entries.
///
/// Rules pointing at a pool entry that has no amount this month are skipped.
#[must_use]
pub fn category_pools(pool_set: &PoolSet) -> BTreeMap<i64, CategoryPool> {
    let pools_by_key: HashMap<&str, &CostPool> = pool_set
        .pools
        .iter()
        .map(|pool| (pool.key.as_str(), pool))
        .collect();

    let mut categories: BTreeMap<i64, CategoryPool> = BTreeMap::new();

    for rule in &pool_set.rules {
        let Some(pool) = pools_by_key.get(rule.pool_key.as_str()) else {
            debug!(
                pool_key = %rule.pool_key,
                category_id = rule.category_id,
                "Distribution rule has no pool entry this month"
            );
            continue;
        };

        let category_amount = pool.amount * rule.percentage / 100.0;
        let category = categories
            .entry(rule.category_id)
            .or_insert_with(|| CategoryPool {
                category_id: rule.category_id,
                amount: 0.0,
                contributions: Vec::new(),
            });
        category.amount += category_amount;
        category.contributions.push(CategoryContribution {
            pool_name: pool.label.clone(),
            base_amount: pool.amount,
            percentage: rule.percentage,
            category_amount,
        });
    }

    categories
}

/// Spreads one pool kind over the targets, weighted by the volume signal.
#[must_use]
pub fn allocate(
    kind: PoolKind,
    pool_set: &PoolSet,
    targets: &[AllocationTarget],
    volumes: &VolumeSignal,
) -> Allocation {
    let mut allocation = Allocation {
        kind,
        pool_total: pool_set.total(),
        distributed_total: 0.0,
        products: BTreeMap::new(),
    };

    if pool_set.pools.is_empty() {
        info!(pool = %kind, "No cost pool entries for the month, nothing to distribute");
        for target in targets {
            allocation.products.insert(
                target.product_id,
                ProductAllocation::unallocated(AllocationWarning::NoCostPools { pool: kind }),
            );
        }
        return allocation;
    }

    let categories = category_pools(pool_set);
    let configured: BTreeSet<i64> = pool_set.rules.iter().map(|r| r.category_id).collect();

    let mut members_by_category: BTreeMap<i64, Vec<AllocationTarget>> = BTreeMap::new();
    for target in targets {
        members_by_category
            .entry(target.category_id)
            .or_default()
            .push(*target);
    }

    for (category_id, members) in &members_by_category {
        let Some(category) = categories.get(category_id) else {
            let warning = if configured.contains(category_id) {
                debug!(pool = %kind, category_id, "Category rules match no pool entry this month");
                AllocationWarning::NoPoolAmount {
                    pool: kind,
                    category_id: *category_id,
                }
            } else {
                debug!(pool = %kind, category_id, "Category has no distribution config");
                AllocationWarning::NoDistributionConfig {
                    pool: kind,
                    category_id: *category_id,
                }
            };
            for member in members {
                allocation
                    .products
                    .insert(member.product_id, ProductAllocation::unallocated(warning.clone()));
            }
            continue;
        };

        for (product_id, product_allocation) in split_category(kind, category, members, volumes) {
            allocation.distributed_total += product_allocation.total_assigned;
            allocation.products.insert(product_id, product_allocation);
        }
    }

    info!(
        pool = %kind,
        pool_total = allocation.pool_total,
        distributed_total = allocation.distributed_total,
        categories = categories.len(),
        products = allocation.products.len(),
        "Cost pool allocated"
    );

    allocation
}

// Member counts are tiny, so the usize -> f64 conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn split_category(
    kind: PoolKind,
    category: &CategoryPool,
    members: &[AllocationTarget],
    volumes: &VolumeSignal,
) -> Vec<(i64, ProductAllocation)> {
    let category_total_volume: f64 = members
        .iter()
        .map(|m| volumes.volume_for(m.product_id))
        .sum();
    let has_real_data = category_total_volume > 0.0;
    let products_in_category = members.len();

    info!(
        pool = %kind,
        category_id = category.category_id,
        category_amount = category.amount,
        category_total_volume,
        products_in_category,
        equal_split = !has_real_data,
        "Distributing category pool"
    );

    members
        .iter()
        .map(|member| {
            let product_volume = volumes.volume_for(member.product_id);
            let ratio = if has_real_data {
                product_volume / category_total_volume
            } else {
                1.0 / products_in_category as f64
            };
            let total_assigned = category.amount * ratio;
            let per_unit = if product_volume > 0.0 {
                total_assigned / product_volume
            } else {
                0.0
            };

            let mut warnings = Vec::new();
            if !has_real_data {
                warnings.push(AllocationWarning::EqualSplit {
                    pool: kind,
                    category_id: category.category_id,
                });
            }
            if product_volume <= 0.0 && total_assigned.abs() > 0.0 {
                debug!(
                    pool = %kind,
                    product_id = member.product_id,
                    total_assigned,
                    "Product moved no units, per-unit cost set to 0"
                );
                warnings.push(AllocationWarning::ZeroVolume {
                    pool: kind,
                    assigned_amount: total_assigned,
                });
            }

            let breakdown = category
                .contributions
                .iter()
                .map(|c| PoolContribution {
                    pool_name: c.pool_name.clone(),
                    base_amount: c.base_amount,
                    percentage: c.percentage,
                    category_amount: c.category_amount,
                    assigned_amount: c.category_amount * ratio,
                })
                .collect();

            let product_allocation = ProductAllocation {
                per_unit,
                total_assigned,
                breakdown,
                distribution: Some(DistributionInfo {
                    product_volume,
                    category_total_volume,
                    products_in_category,
                    ratio,
                    percentage_of_category: ratio * 100.0,
                    has_real_data,
                    data_source: volumes.data_source().to_string(),
                }),
                warnings,
            };

            (member.product_id, product_allocation)
        })
        .collect()
}
