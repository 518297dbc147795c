//! Curve implementations for linear partial-equilibrium markets.
//!
//! This module provides the two sides of a market:
//! - [`LinearDemand`]: a downward-sloping inverse demand curve `P = a − b·Q`
//! - [`SupplyCurve`]: either an upward-sloping [`LinearSupply`] `P = c + d·Q`
//!   or a perfectly elastic [`ConstantCost`] (constant marginal cost)

mod constant;
mod demand;
mod linear;

pub use constant::*;
pub use demand::*;
pub use linear::*;

/// A supply (equivalently, marginal cost) curve.
///
/// Supply is non-decreasing in quantity: linear supply has a strictly positive
/// slope, and a constant marginal cost is flat.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SupplyCurveDto", into = "SupplyCurveDto")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SupplyCurve {
    /// Upward-sloping linear supply
    Linear(LinearSupply),
    /// Perfectly elastic supply at a constant marginal cost
    Constant(ConstantCost),
}

/// DTO for supply curves to enable validation during deserialization.
///
/// A bare number is read as a constant marginal cost, a map as a linear curve.
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
#[derive(Debug)]
pub enum SupplyCurveDto {
    /// Linear supply DTO
    Linear(LinearSupplyDto),
    /// Constant marginal cost
    Constant(f64),
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SupplyCurveDto {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_untagged::UntaggedEnumVisitor::new()
            .i64(|value| Ok(SupplyCurveDto::Constant(value as f64)))
            .u64(|value| Ok(SupplyCurveDto::Constant(value as f64)))
            .f64(|value| Ok(SupplyCurveDto::Constant(value)))
            .map(|map| map.deserialize().map(SupplyCurveDto::Linear))
            .deserialize(deserializer)
    }
}

impl TryFrom<SupplyCurveDto> for SupplyCurve {
    type Error = SupplyCurveError;

    fn try_from(value: SupplyCurveDto) -> Result<Self, Self::Error> {
        match value {
            SupplyCurveDto::Linear(curve) => Ok(Self::Linear(curve.try_into()?)),
            SupplyCurveDto::Constant(cost) => Ok(Self::Constant(ConstantCost::new(cost)?)),
        }
    }
}

impl From<SupplyCurve> for SupplyCurveDto {
    fn from(value: SupplyCurve) -> Self {
        match value {
            SupplyCurve::Linear(curve) => Self::Linear(curve.into()),
            SupplyCurve::Constant(cost) => Self::Constant(cost.marginal_cost()),
        }
    }
}

impl From<LinearSupply> for SupplyCurve {
    fn from(value: LinearSupply) -> Self {
        Self::Linear(value)
    }
}

impl From<ConstantCost> for SupplyCurve {
    fn from(value: ConstantCost) -> Self {
        Self::Constant(value)
    }
}

/// Errors that can occur when constructing supply curves
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SupplyCurveError {
    /// Error from constructing a linear supply curve
    #[error("invalid linear supply: {0}")]
    Linear(#[from] LinearSupplyError),
    /// Error from constructing a constant-cost curve
    #[error("invalid marginal cost: {0}")]
    Constant(#[from] ConstantCostError),
}

impl SupplyCurve {
    /// Creates a validated linear supply curve `P = intercept + slope·Q`
    pub fn linear(intercept: f64, slope: f64) -> Result<Self, SupplyCurveError> {
        Ok(LinearSupply::new(intercept, slope)?.into())
    }

    /// Creates a validated constant marginal cost curve
    pub fn constant(marginal_cost: f64) -> Result<Self, SupplyCurveError> {
        Ok(ConstantCost::new(marginal_cost)?.into())
    }

    /// The price at which `q` units are supplied (marginal cost of the q-th unit)
    pub fn price(&self, q: f64) -> f64 {
        match self {
            Self::Linear(curve) => curve.price(q),
            Self::Constant(curve) => curve.marginal_cost(),
        }
    }

    /// The quantity supplied at price `p`.
    ///
    /// A constant-cost curve supplies nothing below its marginal cost and an
    /// unbounded quantity at or above it.
    pub fn quantity(&self, p: f64) -> f64 {
        match self {
            Self::Linear(curve) => curve.quantity(p),
            Self::Constant(curve) => curve.quantity(p),
        }
    }

    /// The price-axis intercept (`c` for linear supply, the marginal cost otherwise)
    pub fn intercept(&self) -> f64 {
        match self {
            Self::Linear(curve) => curve.intercept(),
            Self::Constant(curve) => curve.marginal_cost(),
        }
    }

    /// The slope `dP/dQ` (zero for constant marginal cost)
    pub fn slope(&self) -> f64 {
        match self {
            Self::Linear(curve) => curve.slope(),
            Self::Constant(_) => 0.0,
        }
    }

    /// The area under the curve over `[q0, q1]`, i.e. the variable cost of
    /// producing those units.
    pub fn cost(&self, q0: f64, q1: f64) -> f64 {
        let c = self.intercept();
        let d = self.slope();
        c * (q1 - q0) + 0.5 * d * (q1 * q1 - q0 * q0)
    }

    /// The area between a received price and the curve over `[0, q]`.
    pub fn producer_surplus(&self, price: f64, q: f64) -> f64 {
        price * q - self.cost(0.0, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_constant() {
        let curve = serde_json::from_str::<SupplyCurve>("4").unwrap();
        assert_eq!(curve, SupplyCurve::constant(4.0).unwrap());

        let curve = serde_json::from_str::<SupplyCurve>("4.5").unwrap();
        assert_eq!(curve.intercept(), 4.5);
    }

    #[test]
    fn test_deserialize_linear() {
        let raw = r#"{
            "intercept": 10.0,
            "slope": 1.0
        }"#;

        let curve = serde_json::from_str::<SupplyCurve>(raw).unwrap();
        assert_eq!(curve, SupplyCurve::linear(10.0, 1.0).unwrap());
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<SupplyCurve>("-1").is_err());
        assert!(serde_json::from_str::<SupplyCurve>(r#"{"intercept": 10.0, "slope": -1.0}"#).is_err());
        assert!(serde_json::from_str::<SupplyCurve>(r#"[1.0, 2.0]"#).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let linear = serde_json::to_value(SupplyCurve::linear(10.0, 1.0).unwrap()).unwrap();
        assert_eq!(linear["intercept"], 10.0);
        assert_eq!(linear["slope"], 1.0);

        let constant = serde_json::to_value(SupplyCurve::constant(9.0).unwrap()).unwrap();
        assert_eq!(constant, 9.0);
    }

    #[test]
    fn test_producer_surplus_under_ceiling() {
        // Supply P = 10 + Q, received price 25, 15 units: triangle ½·15·15
        let supply = SupplyCurve::linear(10.0, 1.0).unwrap();
        assert_eq!(supply.producer_surplus(25.0, 15.0), 112.5);
    }

    #[test]
    fn test_constant_cost_geometry() {
        let supply = SupplyCurve::constant(4.0).unwrap();
        assert_eq!(supply.price(1000.0), 4.0);
        assert_eq!(supply.slope(), 0.0);
        assert_eq!(supply.cost(142.0, 284.0), 4.0 * 142.0);
        assert_eq!(supply.producer_surplus(75.0, 142.0), 71.0 * 142.0);
    }
}
