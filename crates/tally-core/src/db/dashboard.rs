//! Cross-domain overview

use serde::Serialize;

use super::Database;
use crate::aggregate::{CashflowSummary, ProfitSummary, TargetStatus};
use crate::error::Result;

/// Everything the landing page shows at once
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub sales_count: i64,
    pub cost_count: i64,
    pub sga_count: i64,
    pub cashflow_count: i64,
    pub tag_count: i64,
    pub snapshot_count: i64,
    pub profit: ProfitSummary,
    pub target: TargetStatus,
    pub cashflow: CashflowSummary,
}

impl Database {
    pub fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let profit = self.profit_summary()?;
        Ok(DashboardSummary {
            sales_count: self.count_rows("sales")?,
            cost_count: self.count_rows("costs")?,
            sga_count: self.count_rows("sg_a_costs")?,
            cashflow_count: self.count_rows("cashflow")?,
            tag_count: self.count_rows("tags")?,
            snapshot_count: self.count_rows("profits")?,
            target: TargetStatus::new(self.target_revenue()?, profit.revenue),
            profit,
            cashflow: self.cashflow_summary()?,
        })
    }
}
