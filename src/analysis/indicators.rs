use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{Indicator, IndicatorColumn, PriceSeries};
use ta::indicators::{BollingerBands, ExponentialMovingAverage, SimpleMovingAverage};
use ta::Next;

/// Window sizes for the indicator columns
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub bb_window: usize,
    pub bb_std_dev: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub rsi_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_fast: 5,
            ma_slow: 20,
            bb_window: 20,
            bb_std_dev: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            rsi_window: 14,
        }
    }
}

/// Add MA5, MA20, BB_upper, BB_lower, MACD and RSI columns to `series`
pub fn calculate_indicators(series: &mut PriceSeries) -> AnalysisResult<()> {
    calculate_indicators_with(series, &IndicatorParams::default())
}

/// Same as [`calculate_indicators`] with explicit window sizes.
///
/// Rows before a window fills hold `None`. Existing candles are never
/// touched; previously computed columns are replaced with fresh values.
pub fn calculate_indicators_with(
    series: &mut PriceSeries,
    params: &IndicatorParams,
) -> AnalysisResult<()> {
    let closes = series.close_prices();

    let ma_fast = calculate_sma(&closes, params.ma_fast)?;
    let ma_slow = calculate_sma(&closes, params.ma_slow)?;
    let (bb_upper, bb_lower) =
        calculate_bollinger_bands(&closes, params.bb_window, params.bb_std_dev)?;
    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow)?;
    let rsi = calculate_rsi(&closes, params.rsi_window)?;

    for (indicator, column) in [
        (Indicator::Ma5, ma_fast),
        (Indicator::Ma20, ma_slow),
        (Indicator::BbUpper, bb_upper),
        (Indicator::BbLower, bb_lower),
        (Indicator::Macd, macd),
        (Indicator::Rsi, rsi),
    ] {
        series
            .set_column(indicator, column)
            .map_err(|e| AnalysisError::IndicatorCalculation(e.to_string()))?;
    }

    log::debug!(
        "Calculated {} indicator columns over {} rows for {}/{}",
        Indicator::ALL.len(),
        series.len(),
        series.symbol,
        series.interval
    );
    Ok(())
}

/// Simple Moving Average (SMA) over a trailing window
pub fn calculate_sma(prices: &[f64], period: usize) -> AnalysisResult<IndicatorColumn> {
    let mut sma = SimpleMovingAverage::new(period).map_err(|e| invalid_period("SMA", period, e))?;

    Ok(prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let value = sma.next(price);
            filled(i, period).then_some(value)
        })
        .collect())
}

/// Exponential Moving Average seeded with the first price.
///
/// `min_periods` rows must be seen before a value is reported.
pub fn calculate_ema(
    prices: &[f64],
    period: usize,
    min_periods: usize,
) -> AnalysisResult<IndicatorColumn> {
    let mut ema =
        ExponentialMovingAverage::new(period).map_err(|e| invalid_period("EMA", period, e))?;

    Ok(prices
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            let value = ema.next(price);
            filled(i, min_periods).then_some(value)
        })
        .collect())
}

/// Bollinger Bands, returned as (upper, lower).
///
/// Bands sit `std_dev_multiplier` population standard deviations around
/// the SMA of the same window.
pub fn calculate_bollinger_bands(
    prices: &[f64],
    period: usize,
    std_dev_multiplier: f64,
) -> AnalysisResult<(IndicatorColumn, IndicatorColumn)> {
    let mut bands = BollingerBands::new(period, std_dev_multiplier).map_err(|e| {
        AnalysisError::InvalidParameter(format!(
            "Bollinger Bands period {} multiplier {}: {:?}",
            period, std_dev_multiplier, e
        ))
    })?;

    let mut upper = Vec::with_capacity(prices.len());
    let mut lower = Vec::with_capacity(prices.len());

    for (i, &price) in prices.iter().enumerate() {
        let output = bands.next(price);
        if filled(i, period) {
            upper.push(Some(output.upper));
            lower.push(Some(output.lower));
        } else {
            upper.push(None);
            lower.push(None);
        }
    }

    Ok((upper, lower))
}

/// MACD line: fast EMA minus slow EMA.
///
/// Defined once the slow EMA has seen `slow_period` rows. Signal and
/// histogram are not produced.
pub fn calculate_macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
) -> AnalysisResult<IndicatorColumn> {
    let fast_ema = calculate_ema(prices, fast_period, fast_period)?;
    let slow_ema = calculate_ema(prices, slow_period, slow_period)?;

    Ok(fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(fast, slow)| match (fast, slow) {
            (Some(fast), Some(slow)) => Some(fast - slow),
            _ => None,
        })
        .collect())
}

/// Relative Strength Index (RSI) with Wilder smoothing
pub fn calculate_rsi(prices: &[f64], period: usize) -> AnalysisResult<IndicatorColumn> {
    if period == 0 {
        return Err(AnalysisError::InvalidParameter(
            "RSI period must be greater than zero".to_string(),
        ));
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());

    // The first row has no previous close and counts as no change
    for i in 0..prices.len() {
        let change = if i == 0 { 0.0 } else { prices[i] - prices[i - 1] };
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    // Wilder's alpha of 1/n is an EMA span of 2n - 1
    let span = 2 * period - 1;
    let avg_gains = calculate_ema(&gains, span, period)?;
    let avg_losses = calculate_ema(&losses, span, period)?;

    Ok(avg_gains
        .iter()
        .zip(avg_losses.iter())
        .map(|(gain, loss)| match (gain, loss) {
            (Some(_), Some(loss)) if *loss == 0.0 => Some(100.0),
            (Some(gain), Some(loss)) => {
                let rs = gain / loss;
                Some(100.0 - (100.0 / (1.0 + rs)))
            }
            _ => None,
        })
        .collect())
}

fn filled(row: usize, window: usize) -> bool {
    row + 1 >= window
}

fn invalid_period(name: &str, period: usize, error: ta::errors::TaError) -> AnalysisError {
    AnalysisError::InvalidParameter(format!("{} period {}: {:?}", name, period, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Candlestick;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    const EPS: f64 = 1e-9;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let candles = closes.iter().enumerate().map(|(i, &close)| {
            let price = Decimal::try_from(close).unwrap();
            let open_time = Utc.timestamp_opt(i as i64 * 60, 0).unwrap();
            Candlestick::new(open_time, price, price, price, price)
        });
        PriceSeries::from_candles("EURUSD", "1m", candles).unwrap()
    }

    fn first_defined(column: &[Option<f64>]) -> Option<usize> {
        column.iter().position(Option::is_some)
    }

    #[test]
    fn test_sma_known_values() {
        let prices: Vec<f64> = (1..=10).map(f64::from).collect();
        let sma = calculate_sma(&prices, 5).unwrap();

        assert_eq!(sma.len(), prices.len());
        assert!(sma[..4].iter().all(Option::is_none));
        assert!((sma[4].unwrap() - 3.0).abs() < EPS);
        assert!((sma[9].unwrap() - 8.0).abs() < EPS);
    }

    #[test]
    fn test_warmup_rows_are_not_computable() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let mut series = series_from_closes(&closes);
        calculate_indicators(&mut series).unwrap();

        let expected = [
            (Indicator::Ma5, 4),
            (Indicator::Ma20, 19),
            (Indicator::BbUpper, 19),
            (Indicator::BbLower, 19),
            (Indicator::Macd, 25),
            (Indicator::Rsi, 13),
        ];
        for (indicator, first) in expected {
            let column = series.column(indicator).unwrap();
            assert_eq!(column.len(), closes.len(), "{}", indicator);
            assert_eq!(first_defined(column), Some(first), "{}", indicator);
            assert!(column[first..].iter().all(Option::is_some), "{}", indicator);
        }
    }

    #[test]
    fn test_short_series_yields_no_values() {
        let mut series = series_from_closes(&[1.0, 2.0, 3.0]);
        calculate_indicators(&mut series).unwrap();

        assert_eq!(series.len(), 3);
        for indicator in [Indicator::Ma5, Indicator::Ma20, Indicator::Macd, Indicator::Rsi] {
            assert!(series.column(indicator).unwrap().iter().all(Option::is_none));
        }
    }

    #[test]
    fn test_empty_series() {
        let mut series = PriceSeries::new("EURUSD", "1m");
        calculate_indicators(&mut series).unwrap();
        assert_eq!(series.column(Indicator::Rsi).unwrap().len(), 0);
    }

    #[test]
    fn test_constant_series_collapses_bands() {
        let mut series = series_from_closes(&[100.0; 30]);
        calculate_indicators(&mut series).unwrap();

        for indicator in [
            Indicator::Ma5,
            Indicator::Ma20,
            Indicator::BbUpper,
            Indicator::BbLower,
        ] {
            for value in series.column(indicator).unwrap().iter().flatten() {
                assert!((value - 100.0).abs() < EPS, "{} = {}", indicator, value);
            }
        }
        for value in series.column(Indicator::Macd).unwrap().iter().flatten() {
            assert!(value.abs() < EPS);
        }
    }

    #[test]
    fn test_bollinger_bands_use_population_std_dev() {
        let prices: Vec<f64> = (1..=20).map(f64::from).collect();
        let (upper, lower) = calculate_bollinger_bands(&prices, 20, 2.0).unwrap();

        // Population variance of 1..=20 is (20^2 - 1) / 12
        let std_dev = (399.0_f64 / 12.0).sqrt();
        assert!((upper[19].unwrap() - (10.5 + 2.0 * std_dev)).abs() < 1e-6);
        assert!((lower[19].unwrap() - (10.5 - 2.0 * std_dev)).abs() < 1e-6);
    }

    #[test]
    fn test_rsi_rising_prices_reach_100() {
        let prices: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
        let rsi = calculate_rsi(&prices, 14).unwrap();

        for value in rsi.iter().flatten() {
            assert!((value - 100.0).abs() < EPS);
        }
        assert!(rsi[29].is_some());
    }

    #[test]
    fn test_rsi_falling_prices_reach_0() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let rsi = calculate_rsi(&prices, 14).unwrap();
        assert!(rsi[29].unwrap() < EPS);
    }

    #[test]
    fn test_rsi_stays_in_range() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + 5.0 * (i as f64 / 3.0).sin()).collect();
        let rsi = calculate_rsi(&prices, 14).unwrap();
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..40).map(|i| 1.0 + i as f64 * 0.01).collect();
        let macd = calculate_macd(&prices, 12, 26).unwrap();
        assert!(macd[24].is_none());
        assert!(macd[39].unwrap() > 0.0);
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let closes: Vec<f64> = (0..50).map(|i| 1.1 + (i as f64 / 7.0).cos() * 0.05).collect();
        let mut once = series_from_closes(&closes);
        calculate_indicators(&mut once).unwrap();
        let mut twice = once.clone();
        calculate_indicators(&mut twice).unwrap();

        for indicator in Indicator::ALL {
            assert_eq!(once.column(indicator), twice.column(indicator));
        }
        assert_eq!(once.candles(), twice.candles());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let mut series = series_from_closes(&[1.0, 2.0]);
        let params = IndicatorParams {
            ma_fast: 0,
            ..IndicatorParams::default()
        };
        let err = calculate_indicators_with(&mut series, &params).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter(_)));
        assert!(calculate_rsi(&[1.0], 0).is_err());
    }
}
