/// The welfare accounting of a market outcome.
///
/// Surpluses are areas on the price/quantity diagram. Deadweight loss is
/// never negative; transfers carry a sign (see [`Transfer`]).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurplusAreas {
    /// Area under demand and above the price consumers effectively pay
    pub consumer_surplus: f64,
    /// Area above supply and below the price producers receive
    pub producer_surplus: f64,
    /// Surplus lost to society relative to the efficient outcome
    pub deadweight_loss: f64,
    /// Payments and resource costs that are not part of either surplus
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub transfers: Vec<Transfer>,
}

impl SurplusAreas {
    /// The amount recorded for a kind of transfer, zero if absent
    pub fn transfer(&self, kind: TransferKind) -> f64 {
        self.transfers
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    /// Consumer plus producer surplus, net of any subsidy paid for by taxpayers
    pub fn total_welfare(&self) -> f64 {
        self.consumer_surplus + self.producer_surplus - self.transfer(TransferKind::SubsidyCost)
    }
}

/// A payment or resource cost that sits outside consumer and producer surplus.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transfer {
    /// What the amount represents
    pub kind: TransferKind,
    /// Positive for an outflow from the party named by `kind`
    pub amount: f64,
}

/// The nature of a [`Transfer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TransferKind {
    /// Paid by the government to producers
    SubsidyCost,
    /// Paid by consumers to whoever allocates the rationed units
    Bribe,
    /// Resources burned by consumers competing for rationed units
    RentSeekingWaste,
    /// Value lost because rationed units reach lower-value consumers
    MisallocationLoss,
}
