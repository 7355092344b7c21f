use memecoin_dashboard_wasm::application::mock_holdings;
use memecoin_dashboard_wasm::domain::market_data::Symbol;
use memecoin_dashboard_wasm::domain::portfolio::{
    Holding, RiskBucket, SortKey, Timeframe, aggregate, aggregate_over, sort_holdings,
    sort_holdings_over,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

#[derive(Debug, Clone)]
struct Portfolio(Vec<Holding>);

fn cents(g: &mut Gen) -> f64 {
    f64::from(u32::arbitrary(g) % 10_000_000) / 100.0
}

fn percent(g: &mut Gen) -> f64 {
    f64::from(i32::arbitrary(g) % 50_000) / 100.0
}

impl Arbitrary for Portfolio {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 12;
        let risks = [RiskBucket::Low, RiskBucket::Medium, RiskBucket::High, RiskBucket::VeryHigh];
        let holdings = (0..len)
            .map(|i| Holding {
                token: format!("Token {i}"),
                symbol: Symbol::from(format!("T{i}").as_str()),
                balance: cents(g),
                value: cents(g),
                buy_price: 0.001,
                current_price: 0.002,
                change: percent(g),
                change_7d: percent(g),
                change_30d: percent(g),
                allocation: f64::from(u8::arbitrary(g) % 100),
                risk: *g.choose(&risks).unwrap_or(&RiskBucket::Low),
                market_cap: 0.0,
                volume_24h: 0.0,
            })
            .collect();
        Portfolio(holdings)
    }
}

#[quickcheck]
fn aggregation_is_idempotent(portfolio: Portfolio) -> bool {
    aggregate(&portfolio.0) == aggregate(&portfolio.0)
}

#[quickcheck]
fn totals_ignore_ordering(portfolio: Portfolio) -> bool {
    let stats = aggregate(&portfolio.0);
    let sorted = sort_holdings(&portfolio.0, SortKey::Change);
    let resorted = aggregate(&sorted);
    (stats.total_value - resorted.total_value).abs() < 1e-6
        && (stats.total_pnl - resorted.total_pnl).abs() < 1e-6
        && stats.holdings_count == resorted.holdings_count
}

#[quickcheck]
fn risk_sort_is_non_decreasing(portfolio: Portfolio) -> bool {
    sort_holdings(&portfolio.0, SortKey::Risk)
        .windows(2)
        .all(|w| w[0].risk.rank() <= w[1].risk.rank())
}

#[quickcheck]
fn numeric_sorts_are_descending_permutations(portfolio: Portfolio) -> bool {
    let by_value = sort_holdings(&portfolio.0, SortKey::Value);
    let by_allocation = sort_holdings(&portfolio.0, SortKey::Allocation);
    by_value.len() == portfolio.0.len()
        && by_value.windows(2).all(|w| w[0].value >= w[1].value)
        && by_allocation.windows(2).all(|w| w[0].allocation >= w[1].allocation)
}

#[quickcheck]
fn change_sort_matches_every_window(portfolio: Portfolio) -> bool {
    [Timeframe::Day, Timeframe::Week, Timeframe::Month].into_iter().all(|tf| {
        sort_holdings_over(&portfolio.0, SortKey::Change, tf)
            .windows(2)
            .all(|w| w[0].change_for(tf) >= w[1].change_for(tf))
    })
}

#[quickcheck]
fn performers_bound_every_change(portfolio: Portfolio) -> bool {
    let stats = aggregate_over(&portfolio.0, Timeframe::Month);
    match (&stats.best_performer, &stats.worst_performer) {
        (Some(best), Some(worst)) => portfolio.0.iter().all(|h| {
            h.change_30d <= best.change_30d && h.change_30d >= worst.change_30d
        }),
        (None, None) => portfolio.0.is_empty(),
        _ => false,
    }
}

#[test]
fn mock_portfolio_sorted_by_risk() {
    let rows: Vec<String> = sort_holdings(&mock_holdings(), SortKey::Risk)
        .iter()
        .map(|h| format!("{} {}", h.symbol, h.risk))
        .collect();
    insta::assert_snapshot!(rows.join("\n"), @r"
    DHAND Low
    RCAT Medium
    CKING Medium
    MDOG High
    GFROG Very High
    ");
}

#[test]
fn mock_portfolio_weekly_leaders() {
    let stats = aggregate_over(&mock_holdings(), Timeframe::Week);
    assert_eq!(stats.best_performer.map(|h| h.symbol), Some(Symbol::from("GFROG")));
    assert_eq!(stats.worst_performer.map(|h| h.symbol), Some(Symbol::from("RCAT")));
}
