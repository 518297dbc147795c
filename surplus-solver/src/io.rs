use crate::charts::{
    self, ChartConfig, Figure, ceiling_panels, monopoly_subsidy, price_floor_panel,
    segmented_pricing,
};
use crate::{LinearMarketModel, MarketError};
use serde::{Deserialize, Serialize};
use surplus_core::models::{
    AllocationMechanism, ConstrainedOutcome, LinearDemand, Map, Market, MarketStructure, SegmentId,
    SegmentedOutcome, SupplyCurve, SurplusAreas,
};
use tracing::{Level, event};

/// A self-contained problem: a market, what is done to it, and what to report.
///
/// Supply curves accept either a bare number (a constant marginal cost) or
/// `{ "intercept": .., "slope": .. }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scenario {
    /// A monopolist before and after a per-unit subsidy
    MonopolySubsidy {
        /// Market demand
        demand: LinearDemand,
        /// The monopolist's cost curve
        marginal_cost: SupplyCurve,
        /// Payment per unit sold
        subsidy: f64,
    },
    /// A competitive market under a price ceiling, rationed by each listed rule
    PriceCeiling {
        /// Market demand
        demand: LinearDemand,
        /// Market supply
        supply: SupplyCurve,
        /// The legal maximum price
        ceiling: f64,
        /// The rationing rules to compare
        #[serde(default = "default_mechanisms")]
        mechanisms: Vec<AllocationMechanism>,
    },
    /// A competitive market under a price floor
    PriceFloor {
        /// Market demand
        demand: LinearDemand,
        /// Market supply
        supply: SupplyCurve,
        /// The legal minimum price
        floor: f64,
    },
    /// A monopolist selling into isolated segments
    SegmentedPricing {
        /// Demand in each segment
        segments: Map<SegmentId, LinearDemand>,
        /// The common marginal cost
        marginal_cost: f64,
    },
}

fn default_mechanisms() -> Vec<AllocationMechanism> {
    vec![AllocationMechanism::Ideal, AllocationMechanism::Random]
}

/// The worked problems that ship with the tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Textbook {
    /// Demand `146 − 0.5Q`, marginal cost 4, subsidy 29
    MonopolySubsidy,
    /// Demand `100 − 2Q`, supply `10 + Q`, ceiling 25; bribes of 20 and queuing costs of 15
    PriceCeiling,
    /// Demand `92 − 2Q` and `64 − 2Q`, marginal cost 9
    SegmentedPricing,
}

impl Textbook {
    /// Every worked problem
    pub const ALL: [Textbook; 3] = [
        Textbook::MonopolySubsidy,
        Textbook::PriceCeiling,
        Textbook::SegmentedPricing,
    ];
}

impl Scenario {
    /// The scenario for a worked problem
    pub fn textbook(problem: Textbook) -> Result<Self, MarketError> {
        let scenario = match problem {
            Textbook::MonopolySubsidy => Self::MonopolySubsidy {
                demand: LinearDemand::new(146.0, 0.5)?,
                marginal_cost: SupplyCurve::constant(4.0)?,
                subsidy: 29.0,
            },
            Textbook::PriceCeiling => Self::PriceCeiling {
                demand: LinearDemand::new(100.0, 2.0)?,
                supply: SupplyCurve::linear(10.0, 1.0)?,
                ceiling: 25.0,
                mechanisms: vec![
                    AllocationMechanism::Ideal,
                    AllocationMechanism::Bribery { bribe: 20.0 },
                    AllocationMechanism::WastefulQueuing {
                        cost_per_unit: 15.0,
                    },
                    AllocationMechanism::Random,
                ],
            },
            Textbook::SegmentedPricing => Self::SegmentedPricing {
                segments: [
                    (SegmentId::from("asia"), LinearDemand::new(92.0, 2.0)?),
                    (SegmentId::from("europe"), LinearDemand::new(64.0, 2.0)?),
                ]
                .into_iter()
                .collect(),
                marginal_cost: 9.0,
            },
        };
        Ok(scenario)
    }

    /// A short, stable name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::MonopolySubsidy { .. } => "monopoly_subsidy",
            Self::PriceCeiling { .. } => "price_ceiling",
            Self::PriceFloor { .. } => "price_floor",
            Self::SegmentedPricing { .. } => "segmented_pricing",
        }
    }

    /// Solve the scenario and lay out its charts.
    ///
    /// Nothing is charted unless every computation succeeds.
    pub fn solve(
        &self,
        model: &LinearMarketModel,
        config: &ChartConfig,
    ) -> Result<Report, MarketError> {
        event!(Level::INFO, scenario = self.name(), "solving scenario");

        let (solution, title, panels) = match self {
            Self::MonopolySubsidy {
                demand,
                marginal_cost,
                subsidy,
            } => {
                let market = Market::new(*demand, *marginal_cost);
                let monopoly = model.monopoly(&market)?;
                let subsidised =
                    model.apply_subsidy_per_unit(&market, MarketStructure::Monopoly, *subsidy)?;
                let panels = vec![monopoly_subsidy(&monopoly, &subsidised, config)];
                (
                    Solution::MonopolySubsidy {
                        monopoly,
                        subsidised,
                    },
                    "Monopoly and a per-unit subsidy",
                    panels,
                )
            }
            Self::PriceCeiling {
                demand,
                supply,
                ceiling,
                mechanisms,
            } => {
                let market = Market::new(*demand, *supply);
                let outcome = model.apply_price_ceiling(&market, *ceiling)?;
                let allocations = mechanisms
                    .iter()
                    .map(|&mechanism| {
                        model
                            .apply_allocation_mechanism(&outcome, mechanism)
                            .map(|surplus| (mechanism, surplus))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let panels = ceiling_panels(&outcome, &allocations, config);
                (
                    Solution::PriceCeiling {
                        outcome,
                        allocations: allocations
                            .into_iter()
                            .map(|(mechanism, surplus)| Allocation { mechanism, surplus })
                            .collect(),
                    },
                    "Price ceiling under alternative allocation rules",
                    panels,
                )
            }
            Self::PriceFloor {
                demand,
                supply,
                floor,
            } => {
                let market = Market::new(*demand, *supply);
                let outcome = model.apply_price_floor(&market, *floor)?;
                let panels = vec![price_floor_panel(&outcome, config)];
                (Solution::PriceFloor { outcome }, "Price floor", panels)
            }
            Self::SegmentedPricing {
                segments,
                marginal_cost,
            } => {
                let outcome = model.dual_price_monopoly(segments, *marginal_cost)?;
                let panels = segmented_pricing(segments, &outcome, config);
                (
                    Solution::SegmentedPricing { outcome },
                    "Uniform versus segment-specific pricing",
                    panels,
                )
            }
        };

        Ok(Report {
            solution,
            figure: Figure {
                title: title.to_owned(),
                config: config.clone(),
                panels,
            },
        })
    }
}

/// The accounting produced by one rationing rule.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Allocation {
    /// The rule applied
    pub mechanism: AllocationMechanism,
    /// The resulting surplus accounting
    pub surplus: SurplusAreas,
}

/// The computed results of a scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Solution {
    /// See [`Scenario::MonopolySubsidy`]
    MonopolySubsidy {
        /// Without the subsidy
        monopoly: ConstrainedOutcome,
        /// With the subsidy
        subsidised: ConstrainedOutcome,
    },
    /// See [`Scenario::PriceCeiling`]
    PriceCeiling {
        /// The ceiling outcome, with highest-value rationing
        outcome: ConstrainedOutcome,
        /// One entry per requested rule, in order
        allocations: Vec<Allocation>,
    },
    /// See [`Scenario::PriceFloor`]
    PriceFloor {
        /// The floor outcome
        outcome: ConstrainedOutcome,
    },
    /// See [`Scenario::SegmentedPricing`]
    SegmentedPricing {
        /// Per-segment and uniform results
        outcome: SegmentedOutcome,
    },
}

/// The solution of a scenario together with the charts that illustrate it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// The numbers
    pub solution: Solution,
    /// The pictures
    pub figure: Figure,
}

impl Report {
    /// Number of chart panels
    pub fn panel_count(&self) -> usize {
        self.figure.panels.len()
    }

    /// The chart panels, in reading order
    pub fn panels(&self) -> &[charts::Chart] {
        &self.figure.panels
    }
}
