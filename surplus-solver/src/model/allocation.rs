use super::LinearMarketModel;
use crate::MarketError;
use surplus_core::models::{
    AllocationMechanism, ConstrainedOutcome, Intervention, SurplusAreas, Transfer, TransferKind,
};
use tracing::{Level, event};

impl LinearMarketModel {
    /// Re-account a binding price ceiling under a rationing rule.
    ///
    /// Each rule depends only on the ceiling, the quantity transacted, the demand
    /// intercept and the marginal willingness to pay at that quantity, plus the
    /// rule's own parameter:
    ///
    /// - **Ideal**: the highest-value consumers are served.
    /// - **Bribery**: as Ideal, but each unit carries a side payment, moved from
    ///   consumer surplus into a [`TransferKind::Bribe`].
    /// - **Wasteful queuing**: as Ideal, but each unit burns resources, moved from
    ///   consumer surplus into deadweight loss.
    /// - **Random**: units do not go to the highest-value consumers. The average
    ///   of the marginal willingness to pay and the ceiling stands in for the
    ///   marginal willingness to pay, leaving a triangle of consumer surplus
    ///   `½·(average − ceiling)·Q`; the shortfall against Ideal is a
    ///   misallocation loss.
    ///
    /// Producers receive the ceiling for every unit under every rule, so producer
    /// surplus is the same for all four.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the outcome is not a price-ceiling outcome, or if a
    /// side payment or queuing cost is negative or exceeds the gap between the
    /// marginal willingness to pay and the ceiling.
    pub fn apply_allocation_mechanism(
        &self,
        outcome: &ConstrainedOutcome,
        mechanism: AllocationMechanism,
    ) -> Result<SurplusAreas, MarketError> {
        let Some(Intervention::PriceCeiling(ceiling)) = outcome.intervention else {
            return Err(self.reject(MarketError::InvalidParameter {
                name: "outcome quantity",
                value: outcome.quantity,
                reason: "allocation mechanisms apply to a binding price ceiling",
            }));
        };

        let quantity = outcome.quantity;
        let intercept = outcome.market.demand.intercept();
        let rent = outcome.willingness_to_pay - ceiling;
        let ideal = 0.5 * (intercept + outcome.willingness_to_pay - 2.0 * ceiling) * quantity;

        let producer_surplus = outcome.surplus.producer_surplus;
        let deadweight_loss = outcome.surplus.deadweight_loss;

        let areas = match mechanism {
            AllocationMechanism::Ideal => SurplusAreas {
                consumer_surplus: ideal,
                producer_surplus,
                deadweight_loss,
                transfers: Vec::new(),
            },
            AllocationMechanism::Bribery { bribe } => {
                self.check_side_payment("bribe", bribe, rent)?;
                let paid = bribe * quantity;
                SurplusAreas {
                    consumer_surplus: ideal - paid,
                    producer_surplus,
                    deadweight_loss,
                    transfers: vec![Transfer {
                        kind: TransferKind::Bribe,
                        amount: paid,
                    }],
                }
            }
            AllocationMechanism::WastefulQueuing { cost_per_unit } => {
                self.check_side_payment("queuing cost", cost_per_unit, rent)?;
                let burned = cost_per_unit * quantity;
                SurplusAreas {
                    consumer_surplus: ideal - burned,
                    producer_surplus,
                    deadweight_loss: deadweight_loss + burned,
                    transfers: vec![Transfer {
                        kind: TransferKind::RentSeekingWaste,
                        amount: burned,
                    }],
                }
            }
            AllocationMechanism::Random => {
                let average_value = 0.5 * (outcome.willingness_to_pay + ceiling);
                let consumer_surplus = 0.5 * (average_value - ceiling) * quantity;
                let misallocated = ideal - consumer_surplus;
                SurplusAreas {
                    consumer_surplus,
                    producer_surplus,
                    deadweight_loss: deadweight_loss + misallocated,
                    transfers: vec![Transfer {
                        kind: TransferKind::MisallocationLoss,
                        amount: misallocated,
                    }],
                }
            }
        };

        event!(
            Level::DEBUG,
            mechanism = mechanism.name(),
            consumer_surplus = areas.consumer_surplus,
            deadweight_loss = areas.deadweight_loss,
            "allocated rationed units"
        );
        Ok(areas)
    }

    // Nobody pays more on top of the ceiling than the marginal unit is worth to them
    fn check_side_payment(
        &self,
        name: &'static str,
        value: f64,
        rent: f64,
    ) -> Result<(), MarketError> {
        self.check_parameter(name, value)?;
        if value > rent + self.settings.tolerance {
            return Err(self.reject(MarketError::InvalidParameter {
                name,
                value,
                reason: "exceeds the marginal consumer's rent over the ceiling",
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::*;
    use surplus_core::models::{LinearDemand, Market, MarketStructure, SupplyCurve};

    #[fixture]
    fn ceiling() -> ConstrainedOutcome {
        let market = Market::new(
            LinearDemand::new(100.0, 2.0).unwrap(),
            SupplyCurve::linear(10.0, 1.0).unwrap(),
        );
        LinearMarketModel::default()
            .apply_price_ceiling(&market, 25.0)
            .unwrap()
    }

    #[rstest]
    fn ideal_matches_ceiling_outcome(ceiling: ConstrainedOutcome) {
        let areas = LinearMarketModel::default()
            .apply_allocation_mechanism(&ceiling, AllocationMechanism::Ideal)
            .unwrap();

        assert_eq!(areas, ceiling.surplus);
    }

    #[rstest]
    fn bribery_transfers_rent(ceiling: ConstrainedOutcome) {
        let areas = LinearMarketModel::default()
            .apply_allocation_mechanism(&ceiling, AllocationMechanism::Bribery { bribe: 20.0 })
            .unwrap();

        assert_abs_diff_eq!(areas.consumer_surplus, 600.0);
        assert_abs_diff_eq!(areas.transfer(TransferKind::Bribe), 300.0);
        assert_abs_diff_eq!(areas.deadweight_loss, 337.5);
    }

    #[rstest]
    fn queuing_burns_rent(ceiling: ConstrainedOutcome) {
        let areas = LinearMarketModel::default()
            .apply_allocation_mechanism(
                &ceiling,
                AllocationMechanism::WastefulQueuing {
                    cost_per_unit: 15.0,
                },
            )
            .unwrap();

        assert_abs_diff_eq!(areas.consumer_surplus, 675.0);
        assert_abs_diff_eq!(areas.transfer(TransferKind::RentSeekingWaste), 225.0);
        assert_abs_diff_eq!(areas.deadweight_loss, 562.5);
    }

    #[rstest]
    fn random_allocation_misallocates(ceiling: ConstrainedOutcome) {
        let areas = LinearMarketModel::default()
            .apply_allocation_mechanism(&ceiling, AllocationMechanism::Random)
            .unwrap();

        // (70 + 25) / 2 = 47.5 stands in for the marginal value of 70
        assert_abs_diff_eq!(areas.consumer_surplus, 168.75);
        assert_abs_diff_eq!(areas.transfer(TransferKind::MisallocationLoss), 731.25);
        assert_abs_diff_eq!(areas.deadweight_loss, 1068.75);
    }

    #[rstest]
    #[case::textbook(100.0, 2.0, 10.0, 1.0, 25.0)]
    #[case::shallow_demand(60.0, 0.5, 5.0, 2.0, 12.0)]
    fn random_allocation_tracks_marginal_value(
        #[case] intercept: f64,
        #[case] slope: f64,
        #[case] supply_intercept: f64,
        #[case] supply_slope: f64,
        #[case] price: f64,
    ) {
        let model = LinearMarketModel::default();
        let market = Market::new(
            LinearDemand::new(intercept, slope).unwrap(),
            SupplyCurve::linear(supply_intercept, supply_slope).unwrap(),
        );
        let outcome = model.apply_price_ceiling(&market, price).unwrap();
        let areas = model
            .apply_allocation_mechanism(&outcome, AllocationMechanism::Random)
            .unwrap();

        // The choke price plays no part: only the marginal value and the ceiling do
        let average = 0.5 * (outcome.willingness_to_pay + price);
        assert_abs_diff_eq!(
            areas.consumer_surplus,
            0.5 * (average - price) * outcome.quantity,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case::bribe_too_large(AllocationMechanism::Bribery { bribe: 45.5 })]
    #[case::negative_bribe(AllocationMechanism::Bribery { bribe: -1.0 })]
    #[case::queue_too_costly(AllocationMechanism::WastefulQueuing { cost_per_unit: 50.0 })]
    fn side_payments_are_bounded(ceiling: ConstrainedOutcome, #[case] mechanism: AllocationMechanism) {
        let err = LinearMarketModel::default()
            .apply_allocation_mechanism(&ceiling, mechanism)
            .unwrap_err();

        assert!(matches!(err, MarketError::InvalidParameter { .. }));
    }

    #[test]
    fn requires_a_ceiling() {
        let market = Market::new(
            LinearDemand::new(146.0, 0.5).unwrap(),
            SupplyCurve::constant(4.0).unwrap(),
        );
        let monopoly = LinearMarketModel::default()
            .solve(&market, MarketStructure::Monopoly, None)
            .unwrap();

        let err = LinearMarketModel::default()
            .apply_allocation_mechanism(&monopoly, AllocationMechanism::Ideal)
            .unwrap_err();

        assert!(matches!(err, MarketError::InvalidParameter { .. }));
    }
}
