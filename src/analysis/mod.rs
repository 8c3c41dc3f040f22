pub mod indicators;

pub use indicators::{calculate_indicators, calculate_indicators_with, IndicatorParams};
