#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for linear partial-equilibrium markets.
///
/// This module contains the curves, markets, interventions and welfare
/// outcomes that the solver operates on and that the presentation layer
/// consumes.
///
/// The models in this module are primarily data structures with validation
/// and elementary geometry (evaluating a curve, the area under it), keeping
/// the equilibrium logic itself in `surplus-solver`.
pub mod models;
