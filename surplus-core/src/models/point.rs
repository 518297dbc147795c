/// A (quantity, price) coordinate.
///
/// Points are the vertices of sampled curves and shaded welfare areas, and
/// mark equilibria on a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The quantity coordinate
    pub quantity: f64,
    /// The price coordinate
    pub price: f64,
}

impl Point {
    /// Convenience constructor
    pub const fn new(quantity: f64, price: f64) -> Self {
        Self { quantity, price }
    }
}

impl From<(f64, f64)> for Point {
    fn from((quantity, price): (f64, f64)) -> Self {
        Self { quantity, price }
    }
}
