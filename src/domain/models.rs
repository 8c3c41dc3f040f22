// src/domain/models.rs
use crate::domain::errors::{MarketDataError, MarketDataResult};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Chat user identity. Mirrors the Telegram user id without tying the
/// domain to the transport crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quotex account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub email: String,
    pub password: String,
    pub email_pass: String,
    pub session_dir: PathBuf,
}

impl CredentialRecord {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        email_pass: impl Into<String>,
        session_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            email_pass: email_pass.into(),
            session_dir: session_dir.into(),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("email", &self.email)
            .field("password", &"***")
            .field("email_pass", &"***")
            .field("session_dir", &self.session_dir)
            .finish()
    }
}

/// Outcome of reading the credential store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigState {
    Configured(CredentialRecord),
    Unconfigured,
}

impl ConfigState {
    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigState::Configured(_))
    }

    pub fn record(&self) -> Option<&CredentialRecord> {
        match self {
            ConfigState::Configured(record) => Some(record),
            ConfigState::Unconfigured => None,
        }
    }
}

/// Virtual stake for demo trading. Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DemoAmount(f64);

impl DemoAmount {
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

// Renders `10.0`, `12.5`, `1e+20`, `1e-05`: whole amounts keep a
// fractional digit and exponents carry a sign and at least two digits.
impl fmt::Display for DemoAmount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{:?}", self.0);
        match repr.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => f.write_str(&repr),
        }
    }
}

/// One OHLC interval
#[derive(Debug, Clone, PartialEq)]
pub struct Candlestick {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Option<Decimal>,
}

impl Candlestick {
    pub fn new(
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Derived columns produced by the indicator engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    Ma5,
    Ma20,
    BbUpper,
    BbLower,
    Macd,
    Rsi,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::Ma5,
        Indicator::Ma20,
        Indicator::BbUpper,
        Indicator::BbLower,
        Indicator::Macd,
        Indicator::Rsi,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Indicator::Ma5 => "MA5",
            Indicator::Ma20 => "MA20",
            Indicator::BbUpper => "BB_upper",
            Indicator::BbLower => "BB_lower",
            Indicator::Macd => "MACD",
            Indicator::Rsi => "RSI",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A derived column. `None` marks rows where the indicator window has not
/// filled yet.
pub type IndicatorColumn = Vec<Option<f64>>;

/// Price history on a strictly increasing time axis, plus any indicator
/// columns computed over it.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: String,
    candles: Vec<Candlestick>,
    columns: BTreeMap<Indicator, IndicatorColumn>,
}

impl PriceSeries {
    pub fn new(symbol: &str, interval: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            interval: interval.to_string(),
            candles: Vec::new(),
            columns: BTreeMap::new(),
        }
    }

    pub fn from_candles(
        symbol: &str,
        interval: &str,
        candles: impl IntoIterator<Item = Candlestick>,
    ) -> MarketDataResult<Self> {
        let mut series = Self::new(symbol, interval);
        for candle in candles {
            series.push(candle)?;
        }
        Ok(series)
    }

    /// Append a candle. Its open time must be after the last candle's.
    pub fn push(&mut self, candle: Candlestick) -> MarketDataResult<()> {
        if let Some(last) = self.candles.last() {
            if candle.open_time <= last.open_time {
                return Err(MarketDataError::OutOfOrder(format!(
                    "{}/{}: candle at {} does not follow {}",
                    self.symbol, self.interval, candle.open_time, last.open_time
                )));
            }
        }

        self.candles.push(candle);
        for column in self.columns.values_mut() {
            column.push(None);
        }
        Ok(())
    }

    pub fn candles(&self) -> &[Candlestick] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn close_prices(&self) -> Vec<f64> {
        self.candles
            .iter()
            .map(|c| c.close.to_f64().unwrap_or_default())
            .collect()
    }

    pub fn column(&self, indicator: Indicator) -> Option<&[Option<f64>]> {
        self.columns.get(&indicator).map(Vec::as_slice)
    }

    /// Indicator value at `row`, if computed and defined
    pub fn value(&self, indicator: Indicator, row: usize) -> Option<f64> {
        self.columns
            .get(&indicator)
            .and_then(|column| column.get(row).copied().flatten())
    }

    pub fn columns(&self) -> impl Iterator<Item = (Indicator, &[Option<f64>])> {
        self.columns
            .iter()
            .map(|(indicator, column)| (*indicator, column.as_slice()))
    }

    /// Insert or replace a derived column. Length must match the row count.
    pub fn set_column(
        &mut self,
        indicator: Indicator,
        column: IndicatorColumn,
    ) -> MarketDataResult<()> {
        if column.len() != self.candles.len() {
            return Err(MarketDataError::InvalidFormat(format!(
                "column {} has {} rows, series has {}",
                indicator,
                column.len(),
                self.candles.len()
            )));
        }
        self.columns.insert(indicator, column);
        Ok(())
    }
}
