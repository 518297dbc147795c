use super::{LinearMarketModel, Trade};
use crate::MarketError;
use surplus_core::models::{
    ConstrainedOutcome, Intervention, Market, MarketStructure, Transfer, TransferKind,
};
use tracing::{Level, event};

impl LinearMarketModel {
    /// Pay producers `subsidy` on every unit sold.
    ///
    /// Producers face the demand curve shifted up by the subsidy; the monopoly
    /// or competitive quantity is recomputed against it and consumers pay the
    /// producer price less the subsidy. The subsidy bill is recorded as a
    /// [`TransferKind::SubsidyCost`] and deadweight loss is measured against
    /// the unsubsidised competitive quantity, so over-subsidising is penalised
    /// as well as under-producing.
    pub fn apply_subsidy_per_unit(
        &self,
        market: &Market,
        structure: MarketStructure,
        subsidy: f64,
    ) -> Result<ConstrainedOutcome, MarketError> {
        self.check_parameter("subsidy", subsidy)?;
        let reference = self.equilibrium(market)?;

        let shifted = Market::new(market.demand.shifted(subsidy)?, market.supply);
        let point = match structure {
            MarketStructure::Competitive => self.equilibrium(&shifted)?,
            MarketStructure::Monopoly => self.monopoly_point(&shifted)?,
        };

        let quantity = point.quantity;
        let producer_price = shifted.demand.price(quantity);
        let consumer_price = producer_price - subsidy;
        self.check_point(quantity, consumer_price)?;

        event!(
            Level::DEBUG,
            subsidy,
            quantity,
            producer_price,
            consumer_price,
            "subsidised equilibrium"
        );

        Ok(self.outcome(
            market,
            structure,
            Some(Intervention::SubsidyPerUnit(subsidy)),
            reference,
            Trade {
                quantity,
                consumer_price,
                producer_price,
                excess_demand: Some(0.0),
            },
            vec![Transfer {
                kind: TransferKind::SubsidyCost,
                amount: subsidy * quantity,
            }],
        ))
    }
}
