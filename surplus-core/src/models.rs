mod curve;
mod intervention;
mod map;
mod market;
mod outcome;
mod point;
mod surplus;

pub use curve::*;
pub use intervention::{AllocationMechanism, Intervention, MarketStructure};
pub use map::Map;
pub use market::Market;
pub use outcome::{
    ConstrainedOutcome, Equilibrium, PricePoint, SegmentOutcome, SegmentedOutcome, UniformOutcome,
};
pub use point::Point;
pub use surplus::{SurplusAreas, Transfer, TransferKind};

use std::fmt;

macro_rules! string_wrapper {
    ($struct:ident) => {
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[doc = concat!("A newtype wrapper for ", stringify!($struct))]
        pub struct $struct(String);

        impl fmt::Display for $struct {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $struct {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_wrapper!(SegmentId);
