use crate::models::{Intervention, Map, Market, MarketStructure, Point, SegmentId, SurplusAreas};

/// A market-clearing (quantity, price) pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equilibrium {
    /// The quantity traded
    pub quantity: f64,
    /// The price at which it trades
    pub price: f64,
}

impl From<Equilibrium> for Point {
    fn from(value: Equilibrium) -> Self {
        Point::new(value.quantity, value.price)
    }
}

/// The result of solving a market under a market structure and (optionally) an intervention.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstrainedOutcome {
    /// The market that was solved
    pub market: Market,
    /// Who sets quantity
    pub structure: MarketStructure,
    /// The intervention in force, if any
    pub intervention: Option<Intervention>,
    /// The quantity actually transacted
    pub quantity: f64,
    /// The price consumers pay (per unit, before any side payments)
    pub consumer_price: f64,
    /// The price producers receive (per unit, including any subsidy)
    pub producer_price: f64,
    /// The marginal consumer's willingness to pay at the transacted quantity
    pub willingness_to_pay: f64,
    /// Quantity demanded less quantity supplied at the consumer price, or
    /// `None` when it is unbounded (a price above a perfectly elastic supply)
    pub excess_demand: Option<f64>,
    /// The efficient, unconstrained competitive equilibrium for comparison
    pub reference: Equilibrium,
    /// Welfare accounting
    pub surplus: SurplusAreas,
}

impl ConstrainedOutcome {
    /// The point on the consumer side of the diagram
    pub fn consumer_point(&self) -> Point {
        Point::new(self.quantity, self.consumer_price)
    }

    /// The point on the producer side of the diagram
    pub fn producer_point(&self) -> Point {
        Point::new(self.quantity, self.producer_price)
    }
}

/// A price, the quantity bought at it, and the resulting consumer surplus.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricePoint {
    /// The price charged
    pub price: f64,
    /// The quantity bought
    pub quantity: f64,
    /// Consumer surplus at this price
    pub consumer_surplus: f64,
}

/// One segment's results under discriminating and uniform pricing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentOutcome {
    /// Segment-specific monopoly price
    pub dual: PricePoint,
    /// The common price charged across all segments
    pub uniform: PricePoint,
    /// How much this segment's consumers gain from uniform pricing (negative if they lose),
    /// and hence would be willing to spend lobbying for it
    pub lobbying_stake: f64,
}

/// The single-price monopoly outcome over all segments combined.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformOutcome {
    /// The common price
    pub price: f64,
    /// Total quantity sold across segments
    pub quantity: f64,
    /// Monopoly profit at the common price
    pub profit: f64,
}

/// Monopoly pricing across isolated demand segments, with and without discrimination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentedOutcome {
    /// The common marginal cost of serving any segment
    pub marginal_cost: f64,
    /// Per-segment results, in input order
    pub segments: Map<SegmentId, SegmentOutcome>,
    /// The uniform-price benchmark
    pub uniform: UniformOutcome,
    /// Monopoly profit when each segment is priced separately
    pub dual_profit: f64,
}
