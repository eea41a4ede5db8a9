//! Price data port.

use crate::domain::error::HorizonError;
use crate::domain::price::PriceBar;
use chrono::NaiveDate;

/// Source of daily closing prices for a symbol.
pub trait PricePort {
    /// Bars dated within `[start_date, end_date]`, ascending by date, unique
    /// dates, positive finite closes. An unknown symbol yields an empty series.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError>;

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError>;

    /// First date, last date and row count stored for `symbol`.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError>;
}

impl<P: PricePort + ?Sized> PricePort for Box<P> {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError> {
        (**self).fetch_prices(symbol, start_date, end_date)
    }

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError> {
        (**self).list_symbols()
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError> {
        (**self).get_data_range(symbol)
    }
}
