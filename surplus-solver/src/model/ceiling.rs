use super::{LinearMarketModel, Trade};
use crate::MarketError;
use surplus_core::models::{ConstrainedOutcome, Intervention, Market, MarketStructure};
use tracing::{Level, event};

impl LinearMarketModel {
    /// Impose a legal maximum price below the competitive equilibrium.
    ///
    /// The short side of the market determines the quantity transacted,
    /// `min(Qd(ceiling), Qs(ceiling))`, which for upward-sloping supply is the
    /// quantity supplied. Consumer surplus assumes the rationed units reach
    /// the consumers who value them most; see
    /// [`apply_allocation_mechanism`](Self::apply_allocation_mechanism) for
    /// other rationing rules.
    ///
    /// # Errors
    ///
    /// `NonBindingIntervention` if the ceiling is at or above the equilibrium price.
    pub fn apply_price_ceiling(
        &self,
        market: &Market,
        ceiling: f64,
    ) -> Result<ConstrainedOutcome, MarketError> {
        self.check_parameter("price ceiling", ceiling)?;
        let reference = self.equilibrium(market)?;
        let intervention = Intervention::PriceCeiling(ceiling);

        if ceiling >= reference.price - self.settings.tolerance {
            return Err(self.reject(MarketError::NonBindingIntervention {
                intervention,
                market_price: reference.price,
            }));
        }

        let quantity = market
            .demand
            .quantity(ceiling)
            .min(market.supply.quantity(ceiling));

        event!(
            Level::DEBUG,
            ceiling,
            quantity,
            shortage = market.excess_demand(ceiling),
            "binding price ceiling"
        );

        Ok(self.outcome(
            market,
            MarketStructure::Competitive,
            Some(intervention),
            reference,
            Trade {
                quantity,
                consumer_price: ceiling,
                producer_price: ceiling,
                excess_demand: Some(market.excess_demand(ceiling)).filter(|e| e.is_finite()),
            },
            Vec::new(),
        ))
    }

    /// Impose a legal minimum price above the competitive equilibrium.
    ///
    /// Quantity is again set by the short side, now the demand side. Producer
    /// surplus assumes the lowest-cost units are the ones sold. With perfectly
    /// elastic supply the excess supply is unbounded and `excess_demand` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// `NonBindingIntervention` if the floor is at or below the equilibrium price.
    pub fn apply_price_floor(
        &self,
        market: &Market,
        floor: f64,
    ) -> Result<ConstrainedOutcome, MarketError> {
        self.check_parameter("price floor", floor)?;
        let reference = self.equilibrium(market)?;
        let intervention = Intervention::PriceFloor(floor);

        if floor <= reference.price + self.settings.tolerance {
            return Err(self.reject(MarketError::NonBindingIntervention {
                intervention,
                market_price: reference.price,
            }));
        }

        let quantity = market
            .demand
            .quantity(floor)
            .min(market.supply.quantity(floor));

        event!(Level::DEBUG, floor, quantity, "binding price floor");

        Ok(self.outcome(
            market,
            MarketStructure::Competitive,
            Some(intervention),
            reference,
            Trade {
                quantity,
                consumer_price: floor,
                producer_price: floor,
                excess_demand: Some(market.excess_demand(floor)).filter(|e| e.is_finite()),
            },
            Vec::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::*;
    use surplus_core::models::{LinearDemand, SupplyCurve};

    #[fixture]
    fn market() -> Market {
        Market::new(
            LinearDemand::new(100.0, 2.0).unwrap(),
            SupplyCurve::linear(10.0, 1.0).unwrap(),
        )
    }

    #[rstest]
    fn ceiling_rations_by_supply(market: Market) {
        let outcome = LinearMarketModel::default()
            .apply_price_ceiling(&market, 25.0)
            .unwrap();

        assert_eq!(outcome.reference.quantity, 30.0);
        assert_eq!(outcome.reference.price, 40.0);
        assert_eq!(outcome.quantity, 15.0);
        assert_eq!(outcome.willingness_to_pay, 70.0);
        assert_eq!(outcome.excess_demand, Some(22.5));
        assert_abs_diff_eq!(outcome.surplus.producer_surplus, 112.5);
        assert_abs_diff_eq!(outcome.surplus.consumer_surplus, 900.0);
        assert_abs_diff_eq!(outcome.surplus.deadweight_loss, 337.5);
    }

    #[rstest]
    #[case::at_equilibrium(40.0)]
    #[case::above_equilibrium(55.0)]
    fn ceiling_must_bind(market: Market, #[case] ceiling: f64) {
        let err = LinearMarketModel::default()
            .apply_price_ceiling(&market, ceiling)
            .unwrap_err();

        assert_eq!(
            err,
            MarketError::NonBindingIntervention {
                intervention: Intervention::PriceCeiling(ceiling),
                market_price: 40.0,
            }
        );
    }

    #[rstest]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    fn ceiling_must_be_valid(market: Market, #[case] ceiling: f64) {
        let err = LinearMarketModel::default()
            .apply_price_ceiling(&market, ceiling)
            .unwrap_err();

        assert!(matches!(err, MarketError::InvalidParameter { .. }));
    }

    #[rstest]
    fn ceiling_below_supply_intercept_shuts_market(market: Market) {
        let outcome = LinearMarketModel::default()
            .apply_price_ceiling(&market, 5.0)
            .unwrap();

        assert_eq!(outcome.quantity, 0.0);
        assert_eq!(outcome.surplus.producer_surplus, 0.0);
        assert_abs_diff_eq!(outcome.surplus.deadweight_loss, 0.5 * 90.0 * 30.0);
    }

    #[test]
    fn ceiling_under_constant_cost() {
        let market = Market::new(
            LinearDemand::new(146.0, 0.5).unwrap(),
            SupplyCurve::constant(4.0).unwrap(),
        );
        let outcome = LinearMarketModel::default()
            .apply_price_ceiling(&market, 3.0)
            .unwrap();

        assert_eq!(outcome.quantity, 0.0);
        assert_eq!(outcome.excess_demand, Some(286.0));
    }

    #[rstest]
    fn floor_rations_by_demand(market: Market) {
        let outcome = LinearMarketModel::default()
            .apply_price_floor(&market, 50.0)
            .unwrap();

        assert_eq!(outcome.quantity, 25.0);
        assert_eq!(outcome.excess_demand, Some(25.0 - 40.0));
        // ½·(100 − 50)·25
        assert_abs_diff_eq!(outcome.surplus.consumer_surplus, 625.0);
        // 50·25 − (10·25 + ½·25²)
        assert_abs_diff_eq!(outcome.surplus.producer_surplus, 687.5);
        // ½·(gap at 25 = 15)·5
        assert_abs_diff_eq!(outcome.surplus.deadweight_loss, 37.5);
    }

    #[test]
    fn floor_over_constant_cost_has_unbounded_glut() {
        let market = Market::new(
            LinearDemand::new(146.0, 0.5).unwrap(),
            SupplyCurve::constant(4.0).unwrap(),
        );
        let outcome = LinearMarketModel::default()
            .apply_price_floor(&market, 10.0)
            .unwrap();

        assert_eq!(outcome.quantity, 272.0);
        assert_eq!(outcome.excess_demand, None);
        // (10 − 4)·272
        assert_abs_diff_eq!(outcome.surplus.producer_surplus, 1632.0);

        // The outcome survives a trip through JSON
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            serde_json::from_str::<ConstrainedOutcome>(&json).unwrap(),
            outcome
        );
    }

    #[rstest]
    fn floor_must_bind(market: Market) {
        let err = LinearMarketModel::default()
            .apply_price_floor(&market, 30.0)
            .unwrap_err();

        assert!(matches!(err, MarketError::NonBindingIntervention { .. }));
    }

    #[rstest]
    fn constrained_welfare_adds_up(market: Market) {
        let model = LinearMarketModel::default();
        let efficient = model.competitive(&market).unwrap().surplus;
        let max_welfare = efficient.consumer_surplus + efficient.producer_surplus;

        for outcome in [
            model.apply_price_ceiling(&market, 25.0).unwrap(),
            model.apply_price_floor(&market, 50.0).unwrap(),
        ] {
            let s = &outcome.surplus;
            assert_abs_diff_eq!(
                s.consumer_surplus + s.producer_surplus + s.deadweight_loss,
                max_welfare,
                epsilon = 1e-9
            );
        }
    }
}
