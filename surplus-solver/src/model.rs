use crate::MarketError;
use surplus_core::models::{
    ConstrainedOutcome, Equilibrium, Intervention, Market, MarketStructure, SurplusAreas, Transfer,
};
use tracing::{Level, event};

mod allocation;
mod ceiling;
mod equilibrium;
mod segmented;
mod subsidy;

/// Numerical settings for [`LinearMarketModel`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Slack allowed when comparing prices and quantities against zero or against each other
    pub tolerance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

/// A closed-form solver for markets with linear demand and linear or constant-cost supply.
///
/// Every operation is a pure function of its arguments: the model holds nothing
/// but its settings, so repeated calls with identical inputs produce identical
/// outputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearMarketModel {
    settings: Settings,
}

impl LinearMarketModel {
    /// Create a new instance with the provided settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings in use
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Solve a market under a market structure and an optional intervention.
    ///
    /// Price controls are modelled for competitive markets only.
    pub fn solve(
        &self,
        market: &Market,
        structure: MarketStructure,
        intervention: Option<Intervention>,
    ) -> Result<ConstrainedOutcome, MarketError> {
        match (intervention, structure) {
            (None, MarketStructure::Competitive) => self.competitive(market),
            (None, MarketStructure::Monopoly) => self.monopoly(market),
            (Some(Intervention::SubsidyPerUnit(subsidy)), _) => {
                self.apply_subsidy_per_unit(market, structure, subsidy)
            }
            (Some(Intervention::PriceCeiling(ceiling)), MarketStructure::Competitive) => {
                self.apply_price_ceiling(market, ceiling)
            }
            (Some(Intervention::PriceFloor(floor)), MarketStructure::Competitive) => {
                self.apply_price_floor(market, floor)
            }
            (Some(Intervention::PriceCeiling(value) | Intervention::PriceFloor(value)), _) => {
                Err(self.reject(MarketError::InvalidParameter {
                    name: "price control",
                    value,
                    reason: "price controls are only modelled for competitive markets",
                }))
            }
        }
    }

    /// Surplus lost relative to the efficient quantity, in either direction
    pub(crate) fn deadweight_loss(
        &self,
        market: &Market,
        reference: &Equilibrium,
        quantity: f64,
    ) -> f64 {
        let loss = market.gap_area(quantity, reference.quantity).abs();
        if loss <= self.settings.tolerance {
            0.0
        } else {
            loss
        }
    }

    /// Reject non-finite or negative scalar parameters
    pub(crate) fn check_parameter(&self, name: &'static str, value: f64) -> Result<(), MarketError> {
        if !value.is_finite() {
            return Err(self.reject(MarketError::InvalidParameter {
                name,
                value,
                reason: "must be finite",
            }));
        }
        if value < 0.0 {
            return Err(self.reject(MarketError::InvalidParameter {
                name,
                value,
                reason: "must be non-negative",
            }));
        }
        Ok(())
    }

    /// Accept a computed (quantity, price) pair, snapping tiny negatives to zero
    pub(crate) fn check_point(
        &self,
        quantity: f64,
        price: f64,
    ) -> Result<Equilibrium, MarketError> {
        let tol = self.settings.tolerance;
        let reason = if !quantity.is_finite() || !price.is_finite() {
            Some("curves do not intersect")
        } else if quantity < -tol {
            Some("negative quantity")
        } else if price < -tol {
            Some("negative price")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(self.reject(MarketError::DegenerateMarket {
                reason,
                quantity,
                price,
            })),
            None => Ok(Equilibrium {
                quantity: quantity.max(0.0),
                price: price.max(0.0),
            }),
        }
    }

    pub(crate) fn reject(&self, error: MarketError) -> MarketError {
        event!(Level::WARN, %error, "rejected market parameters");
        error
    }

    /// Assemble an outcome and its welfare accounting from the terms of trade.
    pub(crate) fn outcome(
        &self,
        market: &Market,
        structure: MarketStructure,
        intervention: Option<Intervention>,
        reference: Equilibrium,
        trade: Trade,
        transfers: Vec<Transfer>,
    ) -> ConstrainedOutcome {
        let Trade {
            quantity,
            consumer_price,
            producer_price,
            excess_demand,
        } = trade;

        let surplus = SurplusAreas {
            consumer_surplus: market.demand.area(0.0, quantity) - consumer_price * quantity,
            producer_surplus: market.supply.producer_surplus(producer_price, quantity),
            deadweight_loss: self.deadweight_loss(market, &reference, quantity),
            transfers,
        };

        event!(
            Level::DEBUG,
            quantity,
            consumer_price,
            producer_price,
            consumer_surplus = surplus.consumer_surplus,
            producer_surplus = surplus.producer_surplus,
            deadweight_loss = surplus.deadweight_loss,
            "solved market outcome"
        );

        ConstrainedOutcome {
            market: *market,
            structure,
            intervention,
            quantity,
            consumer_price,
            producer_price,
            willingness_to_pay: market.demand.price(quantity),
            excess_demand,
            reference,
            surplus,
        }
    }
}

/// The terms on which units change hands: consumers pay `consumer_price` and
/// producers receive `producer_price` for each of `quantity` units.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Trade {
    pub quantity: f64,
    pub consumer_price: f64,
    pub producer_price: f64,
    pub excess_demand: Option<f64>,
}
