//! Checks that regions are declared in a prescribed relative order.

use tracing::debug;

use crate::error::AnalyserResult;
use crate::task::{AnalyserTask, TaskContext};
use crate::tasks::bracketed;

/// Comma separated region names in their required order.
pub const ORDER: &str = "order";

/// Region declaration order check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckRegionOrder;

impl CheckRegionOrder {
    /// First violation of `order` by the declared `names`, if any.
    fn violation(names: &[&str], order: &[String]) -> Option<String> {
        let mut cursor = 0usize;
        for name in names {
            if !order.iter().any(|o| o == name) {
                return Some(format!("Region found with undeclared name: {name}"));
            }
            match order[cursor..].iter().position(|o| o == name) {
                Some(offset) => cursor += offset,
                None => {
                    return Some(format!(
                        "Region '{name}' appears in the wrong order. It appears after '{}'. Order of regions should be {}",
                        order[cursor],
                        bracketed(order)
                    ))
                }
            }
        }
        None
    }
}

impl AnalyserTask for CheckRegionOrder {
    fn id(&self) -> &'static str {
        "api-regions-check-order"
    }

    fn name(&self) -> &'static str {
        "API Regions Order Check"
    }

    fn execute(&self, ctx: &mut TaskContext<'_>) -> AnalyserResult<()> {
        let Some(regions) = ctx.assembly.regions()? else {
            debug!("no regions to check");
            return Ok(());
        };
        let order = ctx.configuration.get_list(ORDER).unwrap_or_default();
        if order.is_empty() {
            ctx.report
                .add_error(format!("{}: No regions declared in the 'order' configuration", self.id()));
            return Ok(());
        }
        if let Some(message) = Self::violation(&regions.region_names(), &order) {
            ctx.report.add_error(format!("{}: {message}", self.id()));
        }
        Ok(())
    }
}
