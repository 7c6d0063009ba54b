use crate::config::CalculatorSettings;
use crate::core::currency::{CurrencyCode, CurrencyPair, FxError, ReferenceRates};
use crate::core::interest::InterestRateTable;
use crate::market::source::{LoadedRates, RateOrigin};
use crate::report::ResultView;
use crate::valuation::board::PairBoard;
use crate::valuation::carry::{CarryEngine, CarryError, CarryInputs, CarryResult};
use log::{debug, warn};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fx(#[from] FxError),
    #[error(transparent)]
    Carry(#[from] CarryError),
}

/// Handle for one in-flight rate refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Caller-owned calculator state.
///
/// Holds the current inputs, the reference table in use and the latest
/// result. Every edit re-prices; an edit whose valuation fails is rolled back
/// so the inputs always describe the displayed result. Refreshes are
/// last-result-wins: only the most recently issued [`RefreshTicket`] may
/// replace the rates; older completions are dropped.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    settings: CalculatorSettings,
    interest: InterestRateTable,
    rates: ReferenceRates,
    origin: RateOrigin,
    latest: Option<CarryResult>,
    issued: u64,
    applied: u64,
}

impl CalculatorSession {
    pub fn new(settings: CalculatorSettings, loaded: LoadedRates) -> Self {
        let interest = settings.interest_rates();
        Self {
            settings,
            interest,
            rates: loaded.rates,
            origin: loaded.origin,
            latest: None,
            issued: 0,
            applied: 0,
        }
    }

    pub fn settings(&self) -> &CalculatorSettings {
        &self.settings
    }

    pub fn pair(&self) -> CurrencyPair {
        self.settings.pair()
    }

    pub fn interest(&self) -> &InterestRateTable {
        &self.interest
    }

    pub fn rates(&self) -> &ReferenceRates {
        &self.rates
    }

    pub fn origin(&self) -> &RateOrigin {
        &self.origin
    }

    pub fn latest(&self) -> Option<&CarryResult> {
        self.latest.as_ref()
    }

    fn price(&self) -> Result<CarryResult, SessionError> {
        let pair = self.pair();
        let spot = self.rates.spot(&pair)?;
        let inputs = CarryInputs::new(
            pair.clone(),
            spot,
            self.interest.get(&pair.base),
            self.interest.get(&pair.quote),
            self.settings.horizon_days,
            self.settings.investment,
        );
        Ok(CarryEngine::evaluate(&inputs)?)
    }

    /// Value the current pair with the current inputs and keep the result.
    pub fn calculate(&mut self) -> Result<&CarryResult, SessionError> {
        let result = self.price()?;
        Ok(self.latest.insert(result))
    }

    /// Run `edit`, then re-price. On failure the inputs are restored and the
    /// previous result stays current.
    fn apply(&mut self, edit: impl FnOnce(&mut Self)) -> Result<&CarryResult, SessionError> {
        let settings = self.settings.clone();
        let interest = self.interest.clone();
        edit(&mut *self);
        match self.price() {
            Ok(result) => Ok(self.latest.insert(result)),
            Err(e) => {
                debug!("edit rejected, restoring {}: {}", settings.pair(), e);
                self.settings = settings;
                self.interest = interest;
                Err(e)
            }
        }
    }

    /// Rendered view of the latest result.
    pub fn view(&self) -> Option<ResultView> {
        self.latest
            .as_ref()
            .map(|result| ResultView::new(result, self.rates.is_direct_quote(&result.pair)))
    }

    /// Major-pairs board on the session's rates and interest inputs.
    pub fn board(&self) -> PairBoard {
        PairBoard::majors(&self.rates, &self.interest)
    }

    /// Swap base and quote. Each interest rate stays with its currency.
    pub fn swap_currencies(&mut self) -> Result<&CarryResult, SessionError> {
        self.apply(|s| {
            std::mem::swap(&mut s.settings.base_currency, &mut s.settings.quote_currency)
        })
    }

    /// Select a new pair. Picking the same currency twice replaces the quote
    /// with the first other currency the reference table knows.
    pub fn select_pair(
        &mut self,
        base: CurrencyCode,
        quote: CurrencyCode,
    ) -> Result<&CarryResult, SessionError> {
        let quote = if base == quote {
            self.rates
                .currencies()
                .into_iter()
                .find(|c| *c != base)
                .ok_or_else(|| FxError::InvalidPair(format!("{}/{}", base, quote)))?
        } else {
            quote
        };
        self.apply(|s| {
            s.settings.base_currency = base;
            s.settings.quote_currency = quote;
        })
    }

    pub fn set_interest_rate(
        &mut self,
        currency: CurrencyCode,
        rate_pct: Decimal,
    ) -> Result<&CarryResult, SessionError> {
        self.apply(|s| s.interest.set(currency, rate_pct))
    }

    pub fn set_horizon(&mut self, horizon_days: u32) -> Result<&CarryResult, SessionError> {
        self.apply(|s| s.settings.horizon_days = horizon_days)
    }

    pub fn set_investment(&mut self, investment: Decimal) -> Result<&CarryResult, SessionError> {
        self.apply(|s| s.settings.investment = investment)
    }

    /// Back to EUR/USD, 90 days, 10 000 and central-bank rates.
    pub fn reset(&mut self) -> Result<&CarryResult, SessionError> {
        self.apply(|s| {
            s.settings = CalculatorSettings::default();
            s.interest = s.settings.interest_rates();
        })
    }

    /// Start a refresh. Any refresh started earlier is superseded.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    pub fn is_refreshing(&self) -> bool {
        self.applied < self.issued
    }

    /// Apply the rates fetched for `ticket` and re-price the current pair.
    ///
    /// Returns `Ok(None)`, leaving the session untouched, if a newer refresh
    /// has been started since. If the new table cannot price the current
    /// pair the rates are still applied, the stale result is cleared and the
    /// error returned.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        loaded: LoadedRates,
    ) -> Result<Option<&CarryResult>, SessionError> {
        if ticket.0 != self.issued {
            debug!(
                "dropping superseded refresh #{} (latest is #{})",
                ticket.0, self.issued
            );
            return Ok(None);
        }
        self.rates = loaded.rates;
        self.origin = loaded.origin;
        self.applied = ticket.0;

        match self.price() {
            Ok(result) => Ok(Some(self.latest.insert(result))),
            Err(e) => {
                warn!("refreshed rates cannot price {}: {}", self.pair(), e);
                self.latest = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::source::FallbackChain;
    use crate::valuation::signal::TradeSignal;
    use rust_decimal_macros::dec;

    fn session() -> CalculatorSession {
        CalculatorSession::new(
            CalculatorSettings::default(),
            FallbackChain::fallback_only().load(),
        )
    }

    fn live(usd: Decimal) -> LoadedRates {
        let mut rates = ReferenceRates::new(CurrencyCode::new("EUR"));
        rates.set_rate(CurrencyCode::new("USD"), usd).unwrap();
        LoadedRates {
            rates,
            origin: RateOrigin::Live {
                source: "test".to_string(),
            },
        }
    }

    #[test]
    fn test_calculate_default_pair() {
        let mut s = session();
        let result = s.calculate().unwrap();
        assert_eq!(result.pair.to_string(), "EUR/USD");
        assert_eq!(result.spot_rate, dec!(1.085));
        assert_eq!(result.signal, TradeSignal::Buy);

        let view = s.view().unwrap();
        assert_eq!(view.pair_info, "Direct Quote");
        assert_eq!(view.profit, "+€30.92");
    }

    #[test]
    fn test_swap_keeps_rates_with_currency() {
        let mut s = session();
        let result = s.swap_currencies().unwrap().clone();
        assert_eq!(result.pair.to_string(), "USD/EUR");
        assert_eq!(result.interest_differential, dec!(-1.25));
        assert!(result.forward_points < Decimal::ZERO);
        assert_eq!(s.view().unwrap().pair_info, "Cross Rate");
    }

    #[test]
    fn test_select_same_currency_picks_other_quote() {
        let mut s = session();
        let result = s
            .select_pair(CurrencyCode::new("USD"), CurrencyCode::new("USD"))
            .unwrap();
        // EUR is the first currency in the table.
        assert_eq!(result.pair.to_string(), "USD/EUR");
    }

    #[test]
    fn test_unknown_currency_errors() {
        let mut s = session();
        let result = s.select_pair(CurrencyCode::new("EUR"), CurrencyCode::new("BRL"));
        assert!(matches!(result, Err(SessionError::Fx(_))));
    }

    #[test]
    fn test_failed_select_keeps_inputs_and_label() {
        let mut s = session();
        s.calculate().unwrap();
        assert!(s
            .select_pair(CurrencyCode::new("USD"), CurrencyCode::new("BRL"))
            .is_err());

        assert_eq!(s.pair().to_string(), "EUR/USD");
        assert_eq!(s.latest().unwrap().pair.to_string(), "EUR/USD");
        assert_eq!(s.view().unwrap().pair_info, "Direct Quote");
    }

    #[test]
    fn test_view_labels_follow_result_pair() {
        let mut s = session();
        s.select_pair(CurrencyCode::new("GBP"), CurrencyCode::new("JPY"))
            .unwrap();
        assert_eq!(s.view().unwrap().pair_info, "Cross Rate");
        s.select_pair(CurrencyCode::new("EUR"), CurrencyCode::new("JPY"))
            .unwrap();
        assert_eq!(s.view().unwrap().pair_info, "Direct Quote");
    }

    #[test]
    fn test_zero_horizon_errors() {
        let mut s = session();
        s.calculate().unwrap();
        let result = s.set_horizon(0);
        assert!(matches!(
            result,
            Err(SessionError::Carry(CarryError::NonPositiveHorizon))
        ));
        assert_eq!(s.settings().horizon_days, 90);
        assert_eq!(s.latest().unwrap().horizon_days, 90);
    }

    #[test]
    fn test_interest_override_recalculates() {
        let mut s = session();
        let result = s
            .set_interest_rate(CurrencyCode::new("USD"), dec!(4.25))
            .unwrap();
        assert_eq!(result.signal, TradeSignal::Neutral);
        assert_eq!(result.forward_rate, result.spot_rate);
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.set_interest_rate(CurrencyCode::new("USD"), dec!(9)).unwrap();
        s.swap_currencies().unwrap();
        let result = s.reset().unwrap();
        assert_eq!(result.pair.to_string(), "EUR/USD");
        assert_eq!(result.interest_differential, dec!(1.25));
    }

    #[test]
    fn test_last_refresh_wins() {
        let mut s = session();
        let first = s.begin_refresh();
        let second = s.begin_refresh();
        assert!(s.is_refreshing());

        // The newer refresh completes first.
        let applied = s.complete_refresh(second, live(dec!(1.10))).unwrap();
        assert_eq!(applied.map(|r| r.spot_rate), Some(dec!(1.10)));
        // The stale one arrives late and is dropped.
        assert!(s.complete_refresh(first, live(dec!(1.20))).unwrap().is_none());

        assert!(!s.is_refreshing());
        assert!(!s.origin().is_fallback());
        assert_eq!(s.latest().unwrap().spot_rate, dec!(1.10));
    }

    #[test]
    fn test_refresh_reprices_latest() {
        let mut s = session();
        s.calculate().unwrap();
        let ticket = s.begin_refresh();
        s.complete_refresh(ticket, live(dec!(1.20))).unwrap();

        assert_eq!(s.latest().unwrap().spot_rate, dec!(1.20));
        assert_eq!(s.view().unwrap().spot, "1.20000");
    }

    #[test]
    fn test_refresh_without_current_pair_clears_result() {
        let mut s = session();
        s.select_pair(CurrencyCode::new("EUR"), CurrencyCode::new("GBP"))
            .unwrap();
        let ticket = s.begin_refresh();
        // The live table only carries USD.
        let result = s.complete_refresh(ticket, live(dec!(1.10)));

        assert!(matches!(result, Err(SessionError::Fx(_))));
        assert!(s.latest().is_none());
        assert!(!s.origin().is_fallback());
        assert!(!s.is_refreshing());
    }

    #[test]
    fn test_superseded_in_flight_refresh_dropped() {
        let mut s = session();
        let first = s.begin_refresh();
        let _second = s.begin_refresh();
        assert!(s.complete_refresh(first, live(dec!(1.20))).unwrap().is_none());
        assert!(s.is_refreshing());
        assert!(s.origin().is_fallback());
    }
}
