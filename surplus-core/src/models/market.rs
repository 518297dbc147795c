use crate::models::{LinearDemand, SupplyCurve};

/// A single market: one inverse demand curve facing one supply curve.
///
/// Both curves are validated on their own; whether they intersect at a
/// non-negative price and quantity is a question for the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Market {
    /// Inverse demand `P = a − b·Q`
    pub demand: LinearDemand,
    /// Supply, or the marginal cost of a monopolist
    pub supply: SupplyCurve,
}

impl Market {
    /// Pair a demand curve with a supply curve
    pub fn new(demand: LinearDemand, supply: impl Into<SupplyCurve>) -> Self {
        Self {
            demand,
            supply: supply.into(),
        }
    }

    /// The vertical distance between demand and supply at `q`
    pub fn gap(&self, q: f64) -> f64 {
        self.demand.price(q) - self.supply.price(q)
    }

    /// The signed area between demand and supply over `[q0, q1]`.
    ///
    /// Positive where demand lies above supply. Both curves are linear, so the
    /// trapezoid rule is exact.
    pub fn gap_area(&self, q0: f64, q1: f64) -> f64 {
        0.5 * (self.gap(q0) + self.gap(q1)) * (q1 - q0)
    }

    /// The excess of quantity demanded over quantity supplied at price `p`
    pub fn excess_demand(&self, p: f64) -> f64 {
        self.demand.quantity(p) - self.supply.quantity(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_area() {
        let market = Market::new(
            LinearDemand::new(100.0, 2.0).unwrap(),
            SupplyCurve::linear(10.0, 1.0).unwrap(),
        );
        assert_eq!(market.gap(30.0), 0.0);
        // Triangle between the curves over [15, 30]: ½·(70 − 25)·15
        assert_eq!(market.gap_area(15.0, 30.0), 337.5);
        assert_eq!(market.gap_area(30.0, 15.0), -337.5);
    }

    #[test]
    fn test_excess_demand() {
        let market = Market::new(
            LinearDemand::new(100.0, 2.0).unwrap(),
            SupplyCurve::linear(10.0, 1.0).unwrap(),
        );
        assert_eq!(market.excess_demand(25.0), 37.5 - 15.0);
        assert_eq!(market.excess_demand(40.0), 0.0);
    }

    #[test]
    fn test_deserialize() {
        let raw = r#"{
            "demand": { "intercept": 146.0, "slope": 0.5 },
            "supply": 4
        }"#;
        let market = serde_json::from_str::<Market>(raw).unwrap();
        assert_eq!(market.supply, SupplyCurve::constant(4.0).unwrap());
        assert_eq!(market.demand.intercept(), 146.0);
    }
}
