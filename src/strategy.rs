//! Contribution-allocation strategies.

use chrono::NaiveDate;

use crate::types::AllocationLine;

/// Context provided to a strategy on a contribution day.
#[derive(Debug)]
pub struct AllocationContext<'a> {
    /// The contribution day.
    pub date: NaiveDate,
    /// Cash to distribute.
    pub contribution: f64,
    /// Asset names, in portfolio order.
    pub names: &'a [String],
    /// Target weights, indexed like `names`.
    pub target_weights: &'a [f64],
    /// Per-asset values on the previous day, indexed like `names`.
    pub prior_values: &'a [f64],
}

/// Trait that contribution strategies implement.
///
/// `allocate` returns one line per asset, in portfolio order. Strategies are
/// pure: they read the context and never touch the ledger themselves.
pub trait ContributionStrategy: Send + Sync {
    /// Returns the name of the strategy.
    fn name(&self) -> &str;

    /// Split the contribution across assets.
    fn allocate(&self, ctx: &AllocationContext) -> Vec<AllocationLine>;
}

/// Invest every contribution at fixed target weights.
///
/// Each asset receives `contribution * target_weight`, regardless of how far
/// it has drifted. When the weights sum to 1 the full contribution is spent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional;

impl ContributionStrategy for Proportional {
    fn name(&self) -> &str {
        "proportional"
    }

    fn allocate(&self, ctx: &AllocationContext) -> Vec<AllocationLine> {
        let current_total: f64 = ctx.prior_values.iter().sum();

        ctx.names
            .iter()
            .zip(ctx.target_weights)
            .zip(ctx.prior_values)
            .map(|((name, &weight), &prior)| AllocationLine {
                name: name.clone(),
                real_weight: prior / current_total,
                allocated: ctx.contribution * weight,
            })
            .collect()
    }
}

/// Skew each contribution toward under-weighted assets.
///
/// For each asset, the drift between target and real weight is amplified by
/// `leverage` and added to the target weight; the resulting buy weight times
/// the contribution is the raw allocation. Allocations are clamped to be
/// non-negative (drifted-high assets are never sold) and the running total
/// is capped at the contribution amount.
///
/// The budget cap is applied greedily in portfolio order: once earlier
/// assets have consumed the whole contribution, later assets receive the
/// remainder (possibly nothing). Which assets get short-changed therefore
/// depends on their position in the asset list; reorder the portfolio to
/// change who wins when the budget is tight.
#[derive(Debug, Clone, Copy)]
pub struct Rebalancing {
    /// Drift-amplification factor. Large values force a full correction
    /// toward target weight, subject to the clamps above.
    pub leverage: f64,
}

impl Rebalancing {
    pub fn new(leverage: f64) -> Self {
        Self { leverage }
    }
}

impl ContributionStrategy for Rebalancing {
    fn name(&self) -> &str {
        "rebalancing"
    }

    fn allocate(&self, ctx: &AllocationContext) -> Vec<AllocationLine> {
        let current_total: f64 = ctx.prior_values.iter().sum();
        let mut allocated_so_far = 0.0;

        ctx.names
            .iter()
            .zip(ctx.target_weights)
            .zip(ctx.prior_values)
            .map(|((name, &weight), &prior)| {
                let real_weight = prior / current_total;
                let drift = weight - real_weight;
                let buy_weight = weight + drift * self.leverage;

                let mut allocation = ctx.contribution * buy_weight;
                if allocation < 0.0 {
                    allocation = 0.0;
                }
                if allocated_so_far + allocation > ctx.contribution {
                    allocation = ctx.contribution - allocated_so_far;
                }
                allocated_so_far += allocation;

                AllocationLine {
                    name: name.clone(),
                    real_weight,
                    allocated: allocation,
                }
            })
            .collect()
    }
}
