//! Employee-cost allocation.
//!
//! The payroll pool holds one entry per employee category: the sum, over active
//! employees of that category, of gross salary plus payroll taxes from each
//! employee's latest salary record at or before the costing month. Active employee
//! distribution configs send a percentage of an employee category's entry to a
//! product category, and the shared proportional allocation does the rest.

use super::{
    allocation::{self, Allocation, AllocationTarget, CostPool, DistributionRule, PoolSet},
    month::ProductionMonth,
    volume::VolumeSignal,
    warning::PoolKind,
};
use crate::entities::{
    employee, employee_category, employee_cost_distribution_config, employee_salary_history,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Latest salary record per employee at or before `month`.
#[must_use]
pub fn latest_salaries(
    salaries: &[employee_salary_history::Model],
    month: ProductionMonth,
) -> HashMap<i64, &employee_salary_history::Model> {
    let month_key = month.key();
    let mut latest: HashMap<i64, &employee_salary_history::Model> = HashMap::new();

    for record in salaries.iter().filter(|s| s.month <= month_key) {
        let newer = latest.get(&record.employee_id).is_none_or(|current| {
            (record.month.as_str(), record.id) > (current.month.as_str(), current.id)
        });
        if newer {
            latest.insert(record.employee_id, record);
        }
    }

    latest
}

/// Builds the payroll pool entries and rules.
#[must_use]
pub fn pool_set(
    categories: &[employee_category::Model],
    employees: &[employee::Model],
    salaries: &[employee_salary_history::Model],
    configs: &[employee_cost_distribution_config::Model],
    month: ProductionMonth,
) -> PoolSet {
    let latest = latest_salaries(salaries, month);
    let names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut amounts: BTreeMap<i64, f64> = BTreeMap::new();
    for employee in employees.iter().filter(|e| e.is_active) {
        let Some(record) = latest.get(&employee.id) else {
            debug!(employee_id = employee.id, "No salary record at or before month");
            continue;
        };
        *amounts.entry(employee.employee_category_id).or_insert(0.0) +=
            record.gross_salary + record.payroll_taxes;
    }

    let pools = amounts
        .into_iter()
        .map(|(category_id, amount)| CostPool {
            key: category_id.to_string(),
            label: names.get(&category_id).map_or_else(
                || format!("Employee category {category_id}"),
                |name| (*name).to_string(),
            ),
            amount,
        })
        .collect();

    let mut active: Vec<&employee_cost_distribution_config::Model> =
        configs.iter().filter(|c| c.is_active).collect();
    active.sort_by_key(|c| c.id);

    let rules = active
        .into_iter()
        .map(|config| DistributionRule {
            pool_key: config.employee_category_id.to_string(),
            category_id: config.product_category_id,
            percentage: config.percentage,
        })
        .collect();

    PoolSet { pools, rules }
}

/// Spreads the payroll pool over the products.
#[must_use]
pub fn allocate(
    pool_set: &PoolSet,
    targets: &[AllocationTarget],
    volumes: &VolumeSignal,
) -> Allocation {
    allocation::allocate(PoolKind::Employee, pool_set, targets, volumes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::volume::DistributionMethod;
    use crate::core::warning::AllocationWarning;
    use crate::test_utils::assert_close;

    fn category(id: i64, name: &str) -> employee_category::Model {
        employee_category::Model {
            id,
            company_id: 1,
            name: name.to_string(),
        }
    }

    fn staff(id: i64, category_id: i64, is_active: bool) -> employee::Model {
        employee::Model {
            id,
            company_id: 1,
            employee_category_id: category_id,
            name: format!("Employee {id}"),
            is_active,
        }
    }

    fn salary(
        id: i64,
        employee_id: i64,
        month: &str,
        gross: f64,
        taxes: f64,
    ) -> employee_salary_history::Model {
        employee_salary_history::Model {
            id,
            employee_id,
            month: month.to_string(),
            gross_salary: gross,
            payroll_taxes: taxes,
        }
    }

    fn config(
        id: i64,
        employee_category_id: i64,
        product_category_id: i64,
        percentage: f64,
        is_active: bool,
    ) -> employee_cost_distribution_config::Model {
        employee_cost_distribution_config::Model {
            id,
            company_id: 1,
            employee_category_id,
            product_category_id,
            percentage,
            is_active,
        }
    }

    fn august() -> ProductionMonth {
        ProductionMonth::from_ym(2025, 8).unwrap()
    }

    #[test]
    fn test_only_latest_salary_record_counts() {
        let salaries = vec![
            salary(1, 1, "2025-01", 1000.0, 200.0),
            salary(2, 1, "2025-06", 1100.0, 220.0),
            salary(3, 1, "2025-10", 5000.0, 0.0),
        ];

        let latest = latest_salaries(&salaries, august());
        assert_eq!(latest[&1].id, 2);
    }

    #[test]
    fn test_pool_groups_active_employees_by_category() {
        let set = pool_set(
            &[category(1, "Operarios"), category(2, "Administración")],
            &[staff(1, 1, true), staff(2, 1, true), staff(3, 2, true), staff(4, 2, false)],
            &[
                salary(1, 1, "2025-08", 1000.0, 250.0),
                salary(2, 2, "2025-07", 900.0, 100.0),
                salary(3, 3, "2025-08", 2000.0, 500.0),
                salary(4, 4, "2025-08", 9999.0, 0.0),
            ],
            &[],
            august(),
        );

        assert_eq!(set.pools.len(), 2);
        assert_eq!(set.pools[0].label, "Operarios");
        assert_eq!(set.pools[0].amount, 2250.0);
        assert_eq!(set.pools[1].label, "Administración");
        assert_eq!(set.pools[1].amount, 2500.0);
    }

    #[test]
    fn test_employees_without_salary_are_skipped() {
        let set = pool_set(
            &[category(1, "Operarios")],
            &[staff(1, 1, true)],
            &[salary(1, 1, "2025-09", 1000.0, 0.0)],
            &[],
            august(),
        );

        assert!(set.pools.is_empty());
    }

    #[test]
    fn test_payroll_split_across_product_categories() {
        let set = pool_set(
            &[category(1, "Operarios")],
            &[staff(1, 1, true)],
            &[salary(1, 1, "2025-08", 800.0, 200.0)],
            &[config(1, 1, 10, 70.0, true), config(2, 1, 20, 30.0, true)],
            august(),
        );
        let targets = [
            AllocationTarget {
                product_id: 1,
                category_id: 10,
            },
            AllocationTarget {
                product_id: 2,
                category_id: 20,
            },
        ];
        let volumes = VolumeSignal::from_rows(DistributionMethod::Sales, [(1, 7.0), (2, 3.0)]);

        let allocation = allocate(&set, &targets, &volumes);

        assert_close(allocation.for_product(1).total_assigned, 700.0);
        assert_close(allocation.for_product(1).per_unit, 100.0);
        assert_close(allocation.for_product(2).total_assigned, 300.0);
        assert_close(allocation.for_product(2).per_unit, 100.0);
        assert_eq!(allocation.for_product(1).breakdown[0].pool_name, "Operarios");
    }

    #[test]
    fn test_inactive_configs_produce_no_rules() {
        let set = pool_set(
            &[category(1, "Operarios")],
            &[staff(1, 1, true)],
            &[salary(1, 1, "2025-08", 1000.0, 0.0)],
            &[config(2, 1, 20, 40.0, false), config(1, 1, 10, 60.0, true)],
            august(),
        );

        assert_eq!(set.rules.len(), 1);
        assert_eq!(set.rules[0].category_id, 10);

        let targets = [
            AllocationTarget {
                product_id: 1,
                category_id: 10,
            },
            AllocationTarget {
                product_id: 2,
                category_id: 20,
            },
        ];
        let volumes = VolumeSignal::from_rows(DistributionMethod::Sales, [(1, 6.0), (2, 4.0)]);
        let allocation = allocate(&set, &targets, &volumes);

        assert_close(allocation.for_product(1).total_assigned, 600.0);
        assert_eq!(allocation.for_product(2).total_assigned, 0.0);
        assert_eq!(
            allocation.for_product(2).warnings,
            vec![AllocationWarning::NoDistributionConfig {
                pool: PoolKind::Employee,
                category_id: 20,
            }]
        );
    }

    #[test]
    fn test_no_payroll_means_no_employee_cost() {
        let set = pool_set(&[], &[], &[], &[config(1, 1, 10, 100.0, true)], august());
        let targets = [AllocationTarget {
            product_id: 1,
            category_id: 10,
        }];
        let volumes = VolumeSignal::from_rows(DistributionMethod::Sales, [(1, 5.0)]);

        let allocation = allocate(&set, &targets, &volumes);
        let product = allocation.for_product(1);

        assert_eq!(product.per_unit, 0.0);
        assert_eq!(
            product.warnings,
            vec![AllocationWarning::NoCostPools {
                pool: PoolKind::Employee
            }]
        );
    }
}
