use super::{
    AreaKind, Chart, ChartConfig, LineStyle, band, consumer_polygon, gap_polygon, level, padded,
    producer_polygon, sample,
};
use surplus_core::models::{AllocationMechanism, ConstrainedOutcome, Point, SurplusAreas};

/// One panel per rationing rule for a binding price ceiling.
///
/// `allocations` pairs each rule with the surplus accounting it produced for
/// `outcome`. Every panel shows the same curves, producer surplus and
/// deadweight-loss triangle; the consumer side is shaded per rule.
pub fn ceiling_panels(
    outcome: &ConstrainedOutcome,
    allocations: &[(AllocationMechanism, SurplusAreas)],
    config: &ChartConfig,
) -> Vec<Chart> {
    allocations
        .iter()
        .map(|(mechanism, areas)| panel(outcome, *mechanism, areas, config))
        .collect()
}

/// A binding price floor: the surplus each side keeps and the loss from the units not sold.
pub fn price_floor_panel(outcome: &ConstrainedOutcome, config: &ChartConfig) -> Chart {
    let market = &outcome.market;
    let floor = outcome.consumer_price;
    let q = outcome.quantity;
    let efficient = outcome.reference;
    let surplus = &outcome.surplus;

    let x_range = (0.0, market.demand.saturation().max(efficient.quantity));
    let n = config.samples;

    Chart::new(
        format!("Price floor at {floor}"),
        x_range,
        padded(market.demand.intercept()),
    )
    .line(
        "Demand",
        LineStyle::Solid,
        sample(|q| market.demand.price(q), x_range, n),
    )
    .line(
        "Supply",
        LineStyle::Solid,
        sample(|q| market.supply.price(q), x_range, n),
    )
    .line("Price floor", LineStyle::Dashed, level(floor, x_range))
    .marker(
        format!("Equilibrium (Q = {}, P = {})", efficient.quantity, efficient.price),
        efficient,
    )
    .marker(
        format!("Quantity demanded (Q = {q})"),
        outcome.consumer_point(),
    )
    .area(
        format!("Consumer surplus = {:.2}", surplus.consumer_surplus),
        AreaKind::ConsumerSurplus,
        consumer_polygon(&market.demand, floor, q),
    )
    .area(
        format!("Producer surplus = {:.2}", surplus.producer_surplus),
        AreaKind::ProducerSurplus,
        producer_polygon(market, floor, q),
    )
    .area(
        format!("Deadweight loss = {:.2}", surplus.deadweight_loss),
        AreaKind::DeadweightLoss,
        gap_polygon(market, q, efficient.quantity),
    )
    .note(match outcome.excess_demand {
        Some(excess) => format!("Excess supply = {:.2}", -excess),
        None => "Excess supply is unbounded".to_owned(),
    })
}

fn panel(
    outcome: &ConstrainedOutcome,
    mechanism: AllocationMechanism,
    areas: &SurplusAreas,
    config: &ChartConfig,
) -> Chart {
    let market = &outcome.market;
    let ceiling = outcome.consumer_price;
    let q = outcome.quantity;
    let efficient = outcome.reference;

    let x_range = (0.0, market.demand.saturation().max(efficient.quantity));
    let n = config.samples;

    let chart = Chart::new(
        format!("Price ceiling at {ceiling}: {} allocation", mechanism.name()),
        x_range,
        padded(market.demand.intercept()),
    )
    .line(
        "Demand",
        LineStyle::Solid,
        sample(|q| market.demand.price(q), x_range, n),
    )
    .line(
        "Supply",
        LineStyle::Solid,
        sample(|q| market.supply.price(q), x_range, n),
    )
    .line("Price ceiling", LineStyle::Dashed, level(ceiling, x_range))
    .marker(
        format!("Equilibrium (Q = {}, P = {})", efficient.quantity, efficient.price),
        efficient,
    )
    .marker(
        format!("Quantity supplied (Q = {q})"),
        outcome.producer_point(),
    )
    .marker(
        format!("Willingness to pay (P = {})", outcome.willingness_to_pay),
        Point::new(q, outcome.willingness_to_pay),
    )
    .area(
        format!("Producer surplus = {:.2}", areas.producer_surplus),
        AreaKind::ProducerSurplus,
        producer_polygon(market, ceiling, q),
    )
    .area(
        format!("Deadweight loss = {:.2}", outcome.surplus.deadweight_loss),
        AreaKind::DeadweightLoss,
        gap_polygon(market, q, efficient.quantity),
    );

    let cs_label = format!("Consumer surplus = {:.2}", areas.consumer_surplus);
    let chart = match mechanism {
        AllocationMechanism::Ideal => chart.area(
            cs_label,
            AreaKind::ConsumerSurplus,
            consumer_polygon(&market.demand, ceiling, q),
        ),
        AllocationMechanism::Bribery { bribe } => chart
            .area(
                cs_label,
                AreaKind::ConsumerSurplus,
                consumer_polygon(&market.demand, ceiling + bribe, q),
            )
            .area(
                format!("Bribes = {:.2}", bribe * q),
                AreaKind::Transfer,
                band(ceiling, ceiling + bribe, q),
            ),
        AllocationMechanism::WastefulQueuing { cost_per_unit } => chart
            .area(
                cs_label,
                AreaKind::ConsumerSurplus,
                consumer_polygon(&market.demand, ceiling + cost_per_unit, q),
            )
            .area(
                format!("Queuing cost = {:.2}", cost_per_unit * q),
                AreaKind::DeadweightLoss,
                band(ceiling, ceiling + cost_per_unit, q),
            ),
        AllocationMechanism::Random => {
            // A band of the same area as the consumer surplus
            let average = ceiling + areas.consumer_surplus / q.max(f64::MIN_POSITIVE);
            chart.area(cs_label, AreaKind::ConsumerSurplus, band(ceiling, average, q))
        }
    };

    let mut chart = chart.note(format!(
        "CS = {:.2}, PS = {:.2}, DWL = {:.2}",
        areas.consumer_surplus, areas.producer_surplus, areas.deadweight_loss
    ));
    for transfer in &areas.transfers {
        chart = chart.note(format!("{:?} = {:.2}", transfer.kind, transfer.amount));
    }
    chart
}
