/**
 * The closed-form solver: equilibria, interventions, allocation rules and segmented pricing.
 */
mod model;
pub use model::*;

mod error;
pub use error::MarketError;

/// Chart data handed to a plotting collaborator: sampled curves, labelled
/// points and shaded welfare areas.
pub mod charts;

/// Scenario documents and the reports produced by solving them.
#[cfg(feature = "io")]
pub mod io;

// Re-export the models so that downstream crates need only depend on the solver
pub use surplus_core::models::*;
