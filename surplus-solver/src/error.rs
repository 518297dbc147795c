use surplus_core::models::{DemandError, Intervention, SupplyCurveError};

/// The ways a market or a requested intervention can fail to produce a meaningful outcome.
///
/// These are raised before any chart data is built; there is no recovery path
/// other than fixing the offending parameters.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// The curves have no unique intersection at a non-negative quantity and price
    #[error("no unique non-negative equilibrium ({reason}): Q = {quantity}, P = {price}")]
    DegenerateMarket {
        /// Which condition failed
        reason: &'static str,
        /// The quantity that was computed, possibly non-finite
        quantity: f64,
        /// The price that was computed, possibly non-finite
        price: f64,
    },

    /// A price control that would not change the free-market outcome
    #[error("{intervention} does not bind: the free-market price is {market_price}")]
    NonBindingIntervention {
        /// The requested intervention
        intervention: Intervention,
        /// The unconstrained equilibrium price
        market_price: f64,
    },

    /// A parameter outside the range the model supports
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        /// The parameter name
        name: &'static str,
        /// The offending value
        value: f64,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A demand curve (typically a shifted one) failed validation
    #[error("invalid demand curve: {0}")]
    Demand(#[from] DemandError),

    /// A supply curve failed validation
    #[error("invalid supply curve: {0}")]
    Supply(#[from] SupplyCurveError),
}
