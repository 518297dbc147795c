use std::fmt;

/// How the supply side of a market sets quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MarketStructure {
    /// Price-taking firms produce where price equals marginal cost
    #[default]
    Competitive,
    /// A single-price monopolist produces where marginal revenue equals marginal cost
    Monopoly,
}

/// An exogenous price intervention on a single market.
///
/// Segmenting a market into separately priced groups acts on a set of
/// markets and is handled by the solver's dual-pricing operation instead.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum Intervention {
    /// A per-unit payment to producers on every unit sold
    SubsidyPerUnit(f64),
    /// A legal maximum price
    PriceCeiling(f64),
    /// A legal minimum price
    PriceFloor(f64),
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubsidyPerUnit(s) => write!(f, "subsidy of {s} per unit"),
            Self::PriceCeiling(p) => write!(f, "price ceiling at {p}"),
            Self::PriceFloor(p) => write!(f, "price floor at {p}"),
        }
    }
}

/// The rule deciding who gets the scarce units under a binding price ceiling.
///
/// Producers receive the ceiling for every unit under each rule; only the
/// consumer side and the associated transfers differ.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "rule", rename_all = "snake_case")
)]
pub enum AllocationMechanism {
    /// Units go to the consumers with the highest willingness to pay
    Ideal,
    /// Each buyer pays an extra side payment per unit to whoever allocates
    Bribery {
        /// Side payment per unit
        bribe: f64,
    },
    /// Each buyer burns a fixed amount of resources per unit (e.g. queuing)
    WastefulQueuing {
        /// Resource cost per unit
        cost_per_unit: f64,
    },
    /// Units go to consumers at random among everyone willing to pay the ceiling
    Random,
}

impl AllocationMechanism {
    /// A short, stable name for labelling
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ideal => "ideal",
            Self::Bribery { .. } => "bribery",
            Self::WastefulQueuing { .. } => "wasteful_queuing",
            Self::Random => "random",
        }
    }
}
