use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use super::{Holding, RiskBucket, Timeframe};

/// Sum of allocation percent per risk bucket, iterated in severity order
pub type RiskDistribution = BTreeMap<RiskBucket, f64>;

/// Derived dashboard figures, recomputed on every holdings change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_value: f64,
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub best_performer: Option<Holding>,
    pub worst_performer: Option<Holding>,
    pub holdings_count: usize,
    pub risk_distribution: RiskDistribution,
}

/// Column the holdings table is ordered by
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Value,
    Change,
    Allocation,
    Risk,
}

/// Stats over the 24h window. Empty input yields zero totals and no performers.
pub fn aggregate(holdings: &[Holding]) -> PortfolioStats {
    aggregate_over(holdings, Timeframe::Day)
}

/// Single pass over `holdings`; performers are picked by the window's change.
pub fn aggregate_over(holdings: &[Holding], timeframe: Timeframe) -> PortfolioStats {
    let mut total_value = 0.0;
    let mut total_pnl = 0.0;
    let mut best: Option<&Holding> = None;
    let mut worst: Option<&Holding> = None;
    let mut risk_distribution = RiskDistribution::new();

    for holding in holdings {
        total_value += holding.value;
        total_pnl += holding.pnl_for(timeframe);
        *risk_distribution.entry(holding.risk).or_insert(0.0) += holding.allocation;

        let change = holding.change_for(timeframe);
        if change.is_nan() {
            continue;
        }
        if best.is_none_or(|b| change > b.change_for(timeframe)) {
            best = Some(holding);
        }
        if worst.is_none_or(|w| change < w.change_for(timeframe)) {
            worst = Some(holding);
        }
    }

    let total_pnl_percent = if total_value > 0.0 { total_pnl / total_value * 100.0 } else { 0.0 };

    PortfolioStats {
        total_value,
        total_pnl,
        total_pnl_percent,
        best_performer: best.cloned(),
        worst_performer: worst.cloned(),
        holdings_count: holdings.len(),
        risk_distribution,
    }
}

/// New ordering of `holdings` with `Change` read over the 24h window.
pub fn sort_holdings(holdings: &[Holding], key: SortKey) -> Vec<Holding> {
    sort_holdings_over(holdings, key, Timeframe::Day)
}

/// New ordering of `holdings`: descending for numeric keys, Low..VeryHigh for risk.
/// `Change` compares `change_for(timeframe)`.
///
/// Uses a stable sort, so equal keys keep their input order. NaN compares equal.
pub fn sort_holdings_over(holdings: &[Holding], key: SortKey, timeframe: Timeframe) -> Vec<Holding> {
    let mut sorted = holdings.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key, timeframe));
    sorted
}

fn compare(a: &Holding, b: &Holding, key: SortKey, timeframe: Timeframe) -> Ordering {
    let descending = |x: f64, y: f64| y.partial_cmp(&x).unwrap_or(Ordering::Equal);
    match key {
        SortKey::Value => descending(a.value, b.value),
        SortKey::Change => descending(a.change_for(timeframe), b.change_for(timeframe)),
        SortKey::Allocation => descending(a.allocation, b.allocation),
        SortKey::Risk => a.risk.rank().cmp(&b.risk.rank()),
    }
}
