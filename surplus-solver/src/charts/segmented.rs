use super::{AreaKind, Chart, ChartConfig, LineStyle, consumer_polygon, level, linspace, padded, sample};
use surplus_core::models::{LinearDemand, Map, Point, PricePoint, SegmentId, SegmentedOutcome};

/// Uniform against segment-specific pricing, panel by panel.
///
/// The panels are: each segment under the uniform price, the aggregate demand
/// with the uniform price, then each segment under its own monopoly price.
/// Segments in `outcome` without a matching demand curve are skipped.
pub fn segmented_pricing(
    segments: &Map<SegmentId, LinearDemand>,
    outcome: &SegmentedOutcome,
    config: &ChartConfig,
) -> Vec<Chart> {
    let paired = outcome
        .segments
        .iter()
        .filter_map(|(id, result)| segments.get(id).map(|demand| (id, demand, result)))
        .collect::<Vec<_>>();

    let uniform = paired
        .iter()
        .map(|(id, demand, result)| {
            segment_panel(
                format!("Uniform pricing: {id}"),
                demand,
                &result.uniform,
                outcome.marginal_cost,
                config,
            )
        })
        .collect::<Vec<_>>();

    let dual = paired
        .iter()
        .map(|(id, demand, result)| {
            segment_panel(
                format!("Separate pricing: {id}"),
                demand,
                &result.dual,
                outcome.marginal_cost,
                config,
            )
            .note(format!(
                "Consumers would spend up to {:.2} lobbying for a uniform price",
                result.lobbying_stake
            ))
        })
        .collect::<Vec<_>>();

    let mut panels = uniform;
    panels.push(aggregate_panel(segments, outcome, config));
    panels.extend(dual);
    panels
}

fn segment_panel(
    title: String,
    demand: &LinearDemand,
    at: &PricePoint,
    marginal_cost: f64,
    config: &ChartConfig,
) -> Chart {
    let x_range = (0.0, demand.saturation());
    Chart::new(title, x_range, padded(demand.intercept()))
        .line(
            "Demand",
            LineStyle::Solid,
            sample(|q| demand.price(q), x_range, config.samples),
        )
        .line("Marginal cost", LineStyle::Dashed, level(marginal_cost, x_range))
        .line(format!("Price = {}", at.price), LineStyle::Dashed, level(at.price, x_range))
        .marker(
            format!("Q = {:.2}, P = {}", at.quantity, at.price),
            Point::new(at.quantity, at.price),
        )
        .area(
            format!("Consumer surplus = {:.4}", at.consumer_surplus),
            AreaKind::ConsumerSurplus,
            consumer_polygon(demand, at.price, at.quantity),
        )
}

fn aggregate_panel(
    segments: &Map<SegmentId, LinearDemand>,
    outcome: &SegmentedOutcome,
    config: &ChartConfig,
) -> Chart {
    let choke = segments
        .values()
        .map(LinearDemand::intercept)
        .fold(0.0, f64::max);
    let saturation = segments.values().map(LinearDemand::saturation).sum::<f64>();
    let x_range = (0.0, saturation);

    // The horizontal sum is kinked, so trace it along the price axis
    let mut aggregate = linspace((0.0, choke), config.samples)
        .map(|p| {
            let q = segments.values().map(|d| d.quantity(p)).sum::<f64>();
            Point::new(q, p)
        })
        .collect::<Vec<_>>();
    aggregate.reverse();

    let uniform = &outcome.uniform;
    let mut chart = Chart::new("Uniform pricing: all segments", x_range, padded(choke))
        .line("Aggregate demand", LineStyle::Solid, aggregate)
        .line(
            "Marginal cost",
            LineStyle::Dashed,
            level(outcome.marginal_cost, x_range),
        )
        .line(
            format!("Uniform price = {}", uniform.price),
            LineStyle::Dashed,
            level(uniform.price, x_range),
        )
        .marker(
            format!("Q = {:.2}, P = {}", uniform.quantity, uniform.price),
            Point::new(uniform.quantity, uniform.price),
        )
        .note(format!(
            "Profit: {:.2} with separate prices, {:.2} with a uniform price",
            outcome.dual_profit, uniform.profit
        ));

    for (id, result) in &outcome.segments {
        chart = chart.note(format!(
            "{id}: consumer surplus {:.4} uniform vs {:.4} separate",
            result.uniform.consumer_surplus, result.dual.consumer_surplus
        ));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearMarketModel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn panels_per_regime() {
        let segments = [
            ("asia", LinearDemand::new(92.0, 2.0).unwrap()),
            ("europe", LinearDemand::new(64.0, 2.0).unwrap()),
        ]
        .into_iter()
        .map(|(id, demand)| (SegmentId::from(id), demand))
        .collect::<Map<_, _>>();
        let outcome = LinearMarketModel::default()
            .dual_price_monopoly(&segments, 9.0)
            .unwrap();

        let panels = segmented_pricing(&segments, &outcome, &ChartConfig::default());
        assert_eq!(panels.len(), 5);
        assert_eq!(panels[0].title, "Uniform pricing: asia");
        assert_eq!(panels[2].title, "Uniform pricing: all segments");
        assert_eq!(panels[4].title, "Separate pricing: europe");

        let cs = panels[0]
            .areas_of(AreaKind::ConsumerSurplus)
            .next()
            .unwrap()
            .size();
        assert_abs_diff_eq!(cs, 588.0625, epsilon = 1e-9);

        let cs = panels[4]
            .areas_of(AreaKind::ConsumerSurplus)
            .next()
            .unwrap()
            .size();
        assert_abs_diff_eq!(cs, 189.0625, epsilon = 1e-9);

        // Aggregate demand runs from the highest choke price down to full saturation
        let aggregate = panels[2].find_series("Aggregate demand").unwrap();
        assert_eq!(aggregate.points.first().unwrap().price, 92.0);
        assert_eq!(aggregate.points.first().unwrap().quantity, 0.0);
        assert_eq!(aggregate.points.last().unwrap().quantity, 78.0);
    }
}
