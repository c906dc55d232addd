//! Branch summary rendering.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ReportError;

use super::record::EmployeeRecord;

/// Heading of the branch totals block.
pub const BRANCH_TOTALS_HEADING: &str = "ИТОГ ФИЛИАЛА:";

/// Branch-wide aggregates over one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTotals {
    pub total_pays: u64,
    pub total_calls: u64,
    /// Average plan percent, rounded to a whole number.
    pub avg_plan: u64,
    /// Average efficiency, rounded to two decimal places.
    pub avg_efficiency: Decimal,
}

impl BranchTotals {
    /// Compute totals, or `None` for an empty cycle.
    pub fn compute(records: &[EmployeeRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let (mut pays, mut calls, mut plan, mut score) = (0u64, 0u64, 0u64, 0u64);
        for record in records {
            pays += u64::from(record.pays);
            calls += u64::from(record.calls);
            plan += u64::from(record.plan_percent);
            score += u64::from(record.efficiency());
        }

        let count = Decimal::from(records.len() as u64);
        let avg_plan = (Decimal::from(plan) / count)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_u64()
            .unwrap_or(0);
        // Rounded from the binary mean, so 1/40 = 0.025000000000000001 gives 0.03.
        let mean = score as f64 / records.len() as f64;
        let avg_efficiency = Decimal::from_f64_retain(mean)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

        Some(Self {
            total_pays: pays,
            total_calls: calls,
            avg_plan,
            avg_efficiency,
        })
    }

    /// The totals block appended under the per-employee lines.
    pub fn render(&self) -> String {
        format!(
            "{BRANCH_TOTALS_HEADING}\n{}/{}/{}\n{}%",
            self.total_pays,
            self.total_calls,
            self.avg_plan,
            format_percent(self.avg_efficiency)
        )
    }
}

/// Render the cycle summary: one `name - score%` line per record followed
/// by the branch totals.
pub fn render(records: &[EmployeeRecord]) -> Result<String, ReportError> {
    let totals = BranchTotals::compute(records).ok_or(ReportError::EmptyReport)?;

    let lines: Vec<String> = records
        .iter()
        .map(|r| format!("{} - {}%", r.name, r.efficiency()))
        .collect();

    Ok(format!("{}\n{}", lines.join("\n"), totals.render()))
}

/// Always show at least one decimal place: `75.0`, `62.5`, `66.67`.
fn format_percent(value: Decimal) -> String {
    let value = value.normalize();
    if value.scale() == 0 {
        format!("{value}.0")
    } else {
        value.to_string()
    }
}
