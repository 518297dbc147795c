use super::{LinearMarketModel, Trade};
use crate::MarketError;
use surplus_core::models::{ConstrainedOutcome, Equilibrium, Market, MarketStructure};
use tracing::{Level, event};

impl LinearMarketModel {
    /// Solve `a − b·Q = c + d·Q` (or `a − b·Q = MC` for constant cost) for the
    /// competitive equilibrium.
    ///
    /// # Errors
    ///
    /// `DegenerateMarket` if the curves are parallel or intersect at a negative
    /// quantity or price, `InvalidParameter` if either curve slopes the wrong way.
    pub fn equilibrium(&self, market: &Market) -> Result<Equilibrium, MarketError> {
        let Market { demand, supply } = market;

        // Only an exact zero is parallel; a solution that overflows fails `check_point`
        let denominator = demand.slope() + supply.slope();
        if denominator == 0.0 {
            return Err(self.reject(MarketError::DegenerateMarket {
                reason: "parallel curves",
                quantity: f64::NAN,
                price: f64::NAN,
            }));
        }
        self.check_slopes(market)?;

        let quantity = (demand.intercept() - supply.intercept()) / denominator;
        let price = demand.price(quantity);
        let equilibrium = self.check_point(quantity, price)?;

        event!(
            Level::DEBUG,
            quantity = equilibrium.quantity,
            price = equilibrium.price,
            "competitive equilibrium"
        );
        Ok(equilibrium)
    }

    /// The unconstrained competitive outcome, with its welfare accounting.
    pub fn competitive(&self, market: &Market) -> Result<ConstrainedOutcome, MarketError> {
        let reference = self.equilibrium(market)?;
        Ok(self.outcome(
            market,
            MarketStructure::Competitive,
            None,
            reference,
            Trade {
                quantity: reference.quantity,
                consumer_price: reference.price,
                producer_price: reference.price,
                excess_demand: Some(0.0),
            },
            Vec::new(),
        ))
    }

    /// The single-price monopoly outcome, `MR(Q) = a − 2b·Q = MC(Q)`, with the
    /// price read off the demand curve.
    ///
    /// Deadweight loss is measured against the competitive equilibrium.
    pub fn monopoly(&self, market: &Market) -> Result<ConstrainedOutcome, MarketError> {
        let reference = self.equilibrium(market)?;
        let Equilibrium { quantity, price } = self.monopoly_point(market)?;

        Ok(self.outcome(
            market,
            MarketStructure::Monopoly,
            None,
            reference,
            Trade {
                quantity,
                consumer_price: price,
                producer_price: price,
                excess_demand: Some(0.0),
            },
            Vec::new(),
        ))
    }

    /// Where marginal revenue meets marginal cost
    pub(crate) fn monopoly_point(&self, market: &Market) -> Result<Equilibrium, MarketError> {
        let Market { demand, supply } = market;
        self.check_slopes(market)?;

        let quantity =
            (demand.intercept() - supply.intercept()) / (2.0 * demand.slope() + supply.slope());
        let price = demand.price(quantity);
        let point = self.check_point(quantity, price)?;

        event!(
            Level::DEBUG,
            quantity = point.quantity,
            price = point.price,
            marginal_revenue = demand.marginal_revenue(point.quantity),
            "monopoly optimum"
        );
        Ok(point)
    }

    // Curves built through the validating constructors always pass; this guards
    // against ones assembled with `new_unchecked`.
    fn check_slopes(&self, market: &Market) -> Result<(), MarketError> {
        let demand_slope = market.demand.slope();
        if !(demand_slope > 0.0) {
            return Err(self.reject(MarketError::InvalidParameter {
                name: "demand slope",
                value: demand_slope,
                reason: "demand must slope downward",
            }));
        }
        let supply_slope = market.supply.slope();
        if !(supply_slope >= 0.0) {
            return Err(self.reject(MarketError::InvalidParameter {
                name: "supply slope",
                value: supply_slope,
                reason: "supply must be non-decreasing",
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use crate::Settings;
    use rstest::*;
    use surplus_core::models::{LinearDemand, LinearSupply, SupplyCurve};

    fn monopoly_market() -> Market {
        Market::new(
            LinearDemand::new(146.0, 0.5).unwrap(),
            SupplyCurve::constant(4.0).unwrap(),
        )
    }

    #[test]
    fn constant_cost_equilibrium() {
        let market = monopoly_market();
        let Equilibrium { quantity, price } =
            LinearMarketModel::default().equilibrium(&market).unwrap();

        assert_eq!(quantity, 284.0);
        assert_eq!(price, 4.0);
        assert_abs_diff_eq!(market.demand.price(quantity), market.supply.price(quantity));
    }

    #[test]
    fn linear_equilibrium() {
        let market = Market::new(
            LinearDemand::new(100.0, 2.0).unwrap(),
            SupplyCurve::linear(10.0, 1.0).unwrap(),
        );
        let Equilibrium { quantity, price } =
            LinearMarketModel::default().equilibrium(&market).unwrap();

        assert_eq!(quantity, 30.0);
        assert_eq!(price, 40.0);
    }

    #[test]
    fn monopoly_optimum() {
        let outcome = LinearMarketModel::default()
            .monopoly(&monopoly_market())
            .unwrap();

        assert_eq!(outcome.quantity, 142.0);
        assert_eq!(outcome.consumer_price, 75.0);
        assert_eq!(outcome.market.demand.marginal_revenue(142.0), 4.0);
        assert_eq!(outcome.reference.quantity, 284.0);
        assert_abs_diff_eq!(outcome.surplus.deadweight_loss, 5041.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.surplus.consumer_surplus, 0.5 * 71.0 * 142.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.surplus.producer_surplus, 71.0 * 142.0, epsilon = 1e-9);
    }

    #[test]
    fn competitive_outcome_has_no_deadweight_loss() {
        let outcome = LinearMarketModel::default()
            .competitive(&monopoly_market())
            .unwrap();

        assert_eq!(outcome.surplus.deadweight_loss, 0.0);
        assert_eq!(outcome.surplus.producer_surplus, 0.0);
        assert_abs_diff_eq!(outcome.surplus.consumer_surplus, 0.5 * 142.0 * 284.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_quantity_is_degenerate() {
        // Supply starts above the choke price
        let market = Market::new(
            LinearDemand::new(10.0, 1.0).unwrap(),
            SupplyCurve::linear(20.0, 1.0).unwrap(),
        );
        let err = LinearMarketModel::default()
            .equilibrium(&market)
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::DegenerateMarket {
                reason: "negative quantity",
                ..
            }
        ));
    }

    #[test]
    fn negative_price_is_degenerate() {
        // Producers pay to get rid of output: intersection below the quantity axis
        let market = Market::new(
            LinearDemand::new(10.0, 1.0).unwrap(),
            SupplyCurve::linear(-30.0, 1.0).unwrap(),
        );
        let err = LinearMarketModel::default()
            .equilibrium(&market)
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::DegenerateMarket {
                reason: "negative price",
                ..
            }
        ));
    }

    #[test]
    fn parallel_curves_are_degenerate() {
        let demand = unsafe { LinearDemand::new_unchecked(10.0, -1.0) };
        let supply = LinearSupply::new(2.0, 1.0).unwrap();
        let err = LinearMarketModel::default()
            .equilibrium(&Market::new(demand, supply))
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::DegenerateMarket {
                reason: "parallel curves",
                ..
            }
        ));
    }

    #[rstest]
    #[case::default_settings(Settings::default())]
    #[case::loose_tolerance(Settings { tolerance: 1e-3 })]
    fn nearly_flat_demand_still_clears(#[case] settings: Settings) {
        let market = Market::new(
            LinearDemand::new(100.0, 1e-10).unwrap(),
            SupplyCurve::constant(4.0).unwrap(),
        );
        let equilibrium = LinearMarketModel::new(settings)
            .equilibrium(&market)
            .unwrap();

        assert_relative_eq!(equilibrium.quantity, 9.6e11, max_relative = 1e-12);
        assert_abs_diff_eq!(equilibrium.price, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn upward_demand_is_invalid() {
        let demand = unsafe { LinearDemand::new_unchecked(10.0, -1.0) };
        let err = LinearMarketModel::default()
            .equilibrium(&Market::new(demand, SupplyCurve::constant(2.0).unwrap()))
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::InvalidParameter {
                name: "demand slope",
                ..
            }
        ));
    }

    #[test]
    fn repeated_solves_are_identical() {
        let model = LinearMarketModel::default();
        let market = monopoly_market();

        let a = model.monopoly(&market).unwrap();
        let b = model.monopoly(&market).unwrap();
        assert_eq!(a.quantity.to_bits(), b.quantity.to_bits());
        assert_eq!(a.surplus.deadweight_loss.to_bits(), b.surplus.deadweight_loss.to_bits());
        assert_eq!(a, b);
    }
}
