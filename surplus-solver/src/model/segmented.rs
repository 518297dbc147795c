use super::LinearMarketModel;
use crate::MarketError;
use surplus_core::models::{
    LinearDemand, Map, PricePoint, SegmentId, SegmentOutcome, SegmentedOutcome, UniformOutcome,
};
use tracing::{Level, event};

impl LinearMarketModel {
    /// Price each isolated demand segment separately, and compare against the
    /// best single price over all segments combined.
    ///
    /// Per segment, `MR(Q) = a − 2b·Q = MC`. The uniform benchmark maximises
    /// `(P − MC)·Σ Qᵢ(P)` over the horizontally summed demand, which has a kink
    /// at every segment's choke price; each linear piece is optimised in closed
    /// form and the most profitable piece wins.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if there are no segments or the marginal cost is
    /// invalid, `DegenerateMarket` if some segment is not worth serving at all
    /// (its choke price does not exceed marginal cost).
    pub fn dual_price_monopoly(
        &self,
        segments: &Map<SegmentId, LinearDemand>,
        marginal_cost: f64,
    ) -> Result<SegmentedOutcome, MarketError> {
        self.check_parameter("marginal cost", marginal_cost)?;
        if segments.is_empty() {
            return Err(self.reject(MarketError::InvalidParameter {
                name: "segment count",
                value: 0.0,
                reason: "at least one demand segment is required",
            }));
        }

        let mut dual = Vec::with_capacity(segments.len());
        for (id, demand) in segments {
            let quantity = (demand.intercept() - marginal_cost) / (2.0 * demand.slope());
            let price = demand.price(quantity);
            if quantity <= self.settings.tolerance {
                return Err(self.reject(MarketError::DegenerateMarket {
                    reason: "marginal cost at or above the segment's choke price",
                    quantity,
                    price,
                }));
            }
            event!(Level::DEBUG, segment = %id, quantity, price, "segment monopoly price");
            dual.push(PricePoint {
                price,
                quantity,
                consumer_surplus: demand.consumer_surplus(price),
            });
        }

        let uniform_price = self.uniform_price(segments, marginal_cost);

        let mut uniform_quantity = 0.0;
        let mut dual_profit = 0.0;
        let segments = segments
            .iter()
            .zip(dual)
            .map(|((id, demand), dual)| {
                let uniform = PricePoint {
                    price: uniform_price,
                    quantity: demand.quantity(uniform_price),
                    consumer_surplus: demand.consumer_surplus(uniform_price),
                };
                uniform_quantity += uniform.quantity;
                dual_profit += (dual.price - marginal_cost) * dual.quantity;

                let outcome = SegmentOutcome {
                    dual,
                    uniform,
                    lobbying_stake: uniform.consumer_surplus - dual.consumer_surplus,
                };
                (id.clone(), outcome)
            })
            .collect::<Map<_, _>>();

        let uniform = UniformOutcome {
            price: uniform_price,
            quantity: uniform_quantity,
            profit: (uniform_price - marginal_cost) * uniform_quantity,
        };

        event!(
            Level::DEBUG,
            uniform_price,
            uniform_profit = uniform.profit,
            dual_profit,
            "segmented pricing"
        );

        Ok(SegmentedOutcome {
            marginal_cost,
            segments,
            uniform,
            dual_profit,
        })
    }

    /// The profit-maximising single price over the aggregate demand.
    fn uniform_price(&self, segments: &Map<SegmentId, LinearDemand>, marginal_cost: f64) -> f64 {
        // Serve segments in order of decreasing choke price; the k most eager
        // segments buy on the price interval between the k-th and (k+1)-th
        // choke prices.
        let mut demands = segments.values().collect::<Vec<_>>();
        demands.sort_by(|a, b| b.intercept().total_cmp(&a.intercept()));

        // Aggregate demand on a piece is Q(P) = A − B·P
        let mut a = 0.0;
        let mut b = 0.0;
        let mut best: Option<(f64, f64)> = None;

        for (k, demand) in demands.iter().enumerate() {
            a += demand.intercept() / demand.slope();
            b += 1.0 / demand.slope();

            let hi = demand.intercept();
            let lo = demands
                .get(k + 1)
                .map(|next| next.intercept())
                .unwrap_or(0.0)
                .max(marginal_cost);
            if lo > hi {
                continue;
            }

            let price = ((a + b * marginal_cost) / (2.0 * b)).clamp(lo, hi);
            let profit = (price - marginal_cost) * (a - b * price);
            if best.is_none_or(|(_, incumbent)| profit > incumbent) {
                best = Some((price, profit));
            }
        }

        // Every segment has a choke price above marginal cost (checked by the caller),
        // so the first piece is never skipped.
        best.map(|(price, _)| price).unwrap_or(marginal_cost)
    }
}
