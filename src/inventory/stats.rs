//! Condition statistics
//!
//! Provides the condition distribution of the table (optionally restricted by
//! name) and a per-item overview annotated with those percentages.

use anyhow::Result;

use crate::core::model::{
    ConditionBreakdown, ConditionShare, OverviewLine, Record, Rounding, AMOUNT, CONDITION, NAME,
    UNKNOWN,
};
use crate::core::render::{RenderConfig, Renderer};
use crate::inventory::table::{name_contains, InventoryTable};

/// Group `records` by condition and turn the counts into percentages
fn breakdown_of<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    rounding: Rounding,
) -> ConditionBreakdown {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut total = 0usize;

    for record in records {
        total += 1;
        let condition = record.get_or(CONDITION, UNKNOWN);
        match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some(entry) => entry.1 += 1,
            None => counts.push((condition, 1)),
        }
    }

    if total == 0 {
        return ConditionBreakdown::default();
    }

    let shares = counts
        .into_iter()
        .map(|(condition, count)| ConditionShare {
            condition: condition.to_string(),
            count,
            percent: rounding.apply(count as f64 / total as f64 * 100.0),
        })
        .collect();

    ConditionBreakdown { total, shares }
}

impl InventoryTable {
    /// Percentage of records per `Condition` value.
    ///
    /// A non-empty `name_filter` restricts the records the same way
    /// [`InventoryTable::search_by_name`] does. Records without a condition
    /// count as `"Unknown"`. No matching records gives an empty breakdown.
    pub fn condition_percentages(
        &self,
        name_filter: Option<&str>,
        rounding: Rounding,
    ) -> ConditionBreakdown {
        let breakdown = match name_filter.filter(|f| !f.is_empty()) {
            Some(filter) => {
                let term = filter.to_lowercase();
                breakdown_of(
                    self.records().iter().filter(|r| name_contains(r, &term)),
                    rounding,
                )
            }
            None => breakdown_of(self.records(), rounding),
        };
        tracing::debug!(
            filter = name_filter.unwrap_or(""),
            total = breakdown.total,
            buckets = breakdown.len(),
            "condition percentages"
        );
        breakdown
    }

    /// Every item with its whole-table condition percentage
    pub fn overview(&self, rounding: Rounding) -> Vec<OverviewLine> {
        let breakdown = self.condition_percentages(None, rounding);

        self.records()
            .iter()
            .map(|record| {
                let condition = record.get_or(CONDITION, UNKNOWN);
                OverviewLine {
                    name: record.get_or(NAME, UNKNOWN).to_string(),
                    condition: condition.to_string(),
                    amount: record.get_or(AMOUNT, UNKNOWN).to_string(),
                    percent: breakdown.get(condition).unwrap_or(0.0),
                }
            })
            .collect()
    }
}

/// Run the conditions command
pub fn run_conditions(
    table: &InventoryTable,
    name_filter: Option<&str>,
    config: RenderConfig,
) -> Result<()> {
    let breakdown = table.condition_percentages(name_filter, config.rounding);
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render_breakdown(&breakdown));
    Ok(())
}

/// Run the overview command
pub fn run_overview(table: &InventoryTable, config: RenderConfig) -> Result<()> {
    let lines = table.overview(config.rounding);
    let renderer = Renderer::with_config(config);
    println!("{}", renderer.render_overview(&lines));
    Ok(())
}
