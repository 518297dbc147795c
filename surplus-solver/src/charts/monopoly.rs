use super::{AreaKind, Chart, ChartConfig, LineStyle, band, gap_polygon, padded, sample};
use surplus_core::models::{ConstrainedOutcome, Intervention};

/// A monopoly before and after a per-unit subsidy, on one diagram.
///
/// `before` is the unsubsidised monopoly outcome and `after` the subsidised
/// one, both for the same market. The two deadweight-loss triangles are shaded
/// against the efficient quantity, and the subsidy bill as a band between the
/// consumer and producer prices.
pub fn monopoly_subsidy(
    before: &ConstrainedOutcome,
    after: &ConstrainedOutcome,
    config: &ChartConfig,
) -> Chart {
    let market = &before.market;
    let demand = market.demand;
    let subsidy = match after.intervention {
        Some(Intervention::SubsidyPerUnit(subsidy)) => subsidy,
        _ => after.producer_price - after.consumer_price,
    };
    let efficient = before.reference;

    let x_max = demand.saturation().max(efficient.quantity);
    let x_range = (0.0, x_max);
    let n = config.samples;

    let mr_end = demand.intercept() / (2.0 * demand.slope());
    let shifted_mr_end = (demand.intercept() + subsidy) / (2.0 * demand.slope());

    Chart::new(
        "Monopoly with a per-unit subsidy",
        x_range,
        padded(demand.intercept() + subsidy),
    )
    .line(
        "Demand",
        LineStyle::Solid,
        sample(|q| demand.price(q), (0.0, demand.saturation()), n),
    )
    .line(
        "Demand faced by the subsidised producer",
        LineStyle::Solid,
        sample(|q| demand.price(q) + subsidy, x_range, n),
    )
    .line(
        "Marginal cost",
        LineStyle::Solid,
        sample(|q| market.supply.price(q), x_range, n),
    )
    .line(
        "Marginal revenue",
        LineStyle::Dashed,
        sample(|q| demand.marginal_revenue(q), (0.0, mr_end), n),
    )
    .line(
        "Marginal revenue with subsidy",
        LineStyle::Dashed,
        sample(|q| demand.marginal_revenue(q) + subsidy, (0.0, shifted_mr_end), n),
    )
    .marker(
        format!("Monopoly (Q = {}, P = {})", before.quantity, before.consumer_price),
        before.consumer_point(),
    )
    .marker(
        format!("Consumers pay (Q = {}, P = {})", after.quantity, after.consumer_price),
        after.consumer_point(),
    )
    .marker(
        format!("Producers receive (Q = {}, P = {})", after.quantity, after.producer_price),
        after.producer_point(),
    )
    .marker(
        format!("Efficient (Q = {}, P = {})", efficient.quantity, efficient.price),
        efficient,
    )
    .area(
        format!("Deadweight loss = {:.2}", before.surplus.deadweight_loss),
        AreaKind::DeadweightLoss,
        gap_polygon(market, before.quantity, efficient.quantity),
    )
    .area(
        format!("Deadweight loss with subsidy = {:.2}", after.surplus.deadweight_loss),
        AreaKind::DeadweightLoss,
        gap_polygon(market, after.quantity, efficient.quantity),
    )
    .area(
        format!("Subsidy bill = {:.2}", subsidy * after.quantity),
        AreaKind::Transfer,
        band(after.consumer_price, after.producer_price, after.quantity),
    )
    .note(format!("Subsidy of {subsidy} per unit"))
}
