//! Aggregation shared by every view of the ledgers
//!
//! Table views, CLI summaries and exported decks all read through these
//! types and functions so displayed and exported figures cannot drift.

use std::collections::BTreeMap;

use serde::Serialize;

/// Group label used for rows with a null or blank tag/category
pub const UNLABELED: &str = "(untagged)";

/// Sum of one value column for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// Month label, `YYYY-MM`
    pub month: String,
    pub amount: f64,
}

/// Sum of one value column for one tag or category, with its share of the total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub amount: f64,
    /// Fraction of the grand total in `0.0..=1.0`; 0 when the grand total is 0
    pub share: f64,
}

/// Actual sales measured against the registered target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    /// No target registered
    NotConfigured { actual: f64 },
    Configured {
        target: f64,
        actual: f64,
        variance: f64,
    },
}

impl TargetStatus {
    pub fn new(target: Option<f64>, actual: f64) -> Self {
        match target {
            Some(target) => Self::Configured {
                target,
                actual,
                variance: variance(actual, target),
            },
            None => Self::NotConfigured { actual },
        }
    }

    pub fn actual(&self) -> f64 {
        match *self {
            Self::NotConfigured { actual } | Self::Configured { actual, .. } => actual,
        }
    }

    pub fn target(&self) -> Option<f64> {
        match *self {
            Self::Configured { target, .. } => Some(target),
            Self::NotConfigured { .. } => None,
        }
    }

    pub fn variance(&self) -> Option<f64> {
        match *self {
            Self::Configured { variance, .. } => Some(variance),
            Self::NotConfigured { .. } => None,
        }
    }
}

/// Live operating profit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub revenue: f64,
    pub cost: f64,
    pub sg_a_cost: f64,
    pub profit: f64,
}

impl ProfitSummary {
    pub fn new(revenue: f64, cost: f64, sg_a_cost: f64) -> Self {
        Self {
            revenue,
            cost,
            sg_a_cost,
            profit: profit(revenue, cost, sg_a_cost),
        }
    }

    /// Profit in thousands, floored after subtraction
    pub fn profit_thousands(&self) -> f64 {
        to_thousands(self.profit)
    }
}

/// Profit figures for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProfit {
    pub month: String,
    pub revenue: f64,
    pub cost: f64,
    pub sg_a_cost: f64,
    pub profit: f64,
}

/// Cashflow totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashflowSummary {
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

/// Cashflow totals for one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCashflow {
    pub month: String,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

/// `actual - target`
pub fn variance(actual: f64, target: f64) -> f64 {
    actual - target
}

/// `revenue - cost - sg_a`, in base units
pub fn profit(revenue: f64, cost: f64, sg_a_cost: f64) -> f64 {
    revenue - cost - sg_a_cost
}

/// Convert a base-unit amount to whole thousands, flooring
pub fn to_thousands(amount: f64) -> f64 {
    (amount / 1000.0).floor()
}

/// Sum an iterator of amounts; empty input is 0
pub fn total<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().sum()
}

/// Group `(label, amount)` pairs by label and attach shares of the grand total
///
/// Null and blank labels fold into [`UNLABELED`]. Groups are ordered by
/// descending amount, ties broken by label.
pub fn group_rollup<I, S>(rows: I) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = (Option<S>, f64)>,
    S: AsRef<str>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for (label, amount) in rows {
        let key = label
            .as_ref()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .unwrap_or(UNLABELED)
            .to_string();
        *groups.entry(key).or_insert(0.0) += amount;
    }
    with_shares(groups.into_iter().collect())
}

/// Attach shares to pre-summed groups and order them
pub fn with_shares(groups: Vec<(String, f64)>) -> Vec<GroupTotal> {
    let grand_total = total(groups.iter().map(|(_, amount)| *amount));
    let mut out: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(label, amount)| GroupTotal {
            share: if grand_total > 0.0 {
                amount / grand_total
            } else {
                0.0
            },
            label,
            amount,
        })
        .collect();
    out.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.label.cmp(&b.label))
    });
    out
}

/// Combine monthly revenue, cost and SG&A roll-ups into monthly profit
///
/// Months missing from a roll-up count as 0 for that column.
pub fn monthly_profit(
    revenue: &[MonthlyTotal],
    cost: &[MonthlyTotal],
    sg_a_cost: &[MonthlyTotal],
) -> Vec<MonthlyProfit> {
    let mut months: BTreeMap<&str, [f64; 3]> = BTreeMap::new();
    for (column, rollup) in [revenue, cost, sg_a_cost].into_iter().enumerate() {
        for m in rollup {
            months.entry(m.month.as_str()).or_insert([0.0; 3])[column] += m.amount;
        }
    }
    months
        .into_iter()
        .map(|(month, [revenue, cost, sg_a_cost])| MonthlyProfit {
            month: month.to_string(),
            revenue,
            cost,
            sg_a_cost,
            profit: profit(revenue, cost, sg_a_cost),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(total(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_total_is_order_independent() {
        let values = [1500.0, 250.0, 0.0, 4000.0];
        let mut reversed = values;
        reversed.reverse();
        assert_eq!(total(values), 5750.0);
        assert_eq!(total(values), total(reversed));
    }

    #[test]
    fn test_group_rollup_unlabeled_bucket_and_shares() {
        let rows = vec![
            (Some("Consulting"), 300.0),
            (None, 100.0),
            (Some(""), 100.0),
            (Some("Retail"), 500.0),
        ];
        let groups = group_rollup(rows);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label, "Retail");
        assert_eq!(groups[0].share, 0.5);
        assert_eq!(groups[1].label, "Consulting");
        assert_eq!(groups[2].label, UNLABELED);
        assert_eq!(groups[2].amount, 200.0);
        let share_sum: f64 = groups.iter().map(|g| g.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_rollup_zero_total_has_zero_shares() {
        let groups = group_rollup(vec![(Some("A"), 0.0), (Some("B"), 0.0)]);
        assert!(groups.iter().all(|g| g.share == 0.0));
        assert_eq!(groups[0].label, "A");
    }

    #[test]
    fn test_target_status() {
        let status = TargetStatus::new(Some(5000.0), 7000.0);
        assert_eq!(status.variance(), Some(2000.0));

        let zero_target = TargetStatus::new(Some(0.0), 7000.0);
        assert_eq!(zero_target.variance(), Some(7000.0));

        let missing = TargetStatus::new(None, 7000.0);
        assert_eq!(missing, TargetStatus::NotConfigured { actual: 7000.0 });
        assert_eq!(missing.variance(), None);
        assert_eq!(missing.actual(), 7000.0);
    }

    #[test]
    fn test_profit_summary_exact_and_thousands() {
        let summary = ProfitSummary::new(10_000.0, 4_000.0, 2_000.0);
        assert_eq!(summary.profit, 4_000.0);
        assert_eq!(summary.profit_thousands(), 4.0);

        // Flooring each term first would give 5 - 1 - 1 = 3
        let summary = ProfitSummary::new(5_999.0, 1_999.0, 1_999.0);
        assert_eq!(summary.profit, 2_001.0);
        assert_eq!(summary.profit_thousands(), 2.0);

        let loss = ProfitSummary::new(0.0, 1_500.0, 0.0);
        assert_eq!(loss.profit_thousands(), -2.0);
    }

    #[test]
    fn test_monthly_profit_unions_months() {
        let revenue = vec![
            MonthlyTotal {
                month: "2024-01".into(),
                amount: 1000.0,
            },
            MonthlyTotal {
                month: "2024-02".into(),
                amount: 800.0,
            },
        ];
        let cost = vec![MonthlyTotal {
            month: "2024-02".into(),
            amount: 300.0,
        }];
        let sga = vec![MonthlyTotal {
            month: "2024-03".into(),
            amount: 50.0,
        }];

        let months = monthly_profit(&revenue, &cost, &sga);
        assert_eq!(months.len(), 3);
        assert_eq!(months[0].profit, 1000.0);
        assert_eq!(months[1].profit, 500.0);
        assert_eq!(months[2].month, "2024-03");
        assert_eq!(months[2].profit, -50.0);
    }
}
