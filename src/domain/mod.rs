// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{
    AnalysisError, AnalysisResult, AppError, AppResult, CommandError, MarketDataError,
    MarketDataResult, StorageError, StorageResult,
};
pub use models::{
    Candlestick, ConfigState, CredentialRecord, DemoAmount, Indicator, IndicatorColumn,
    PriceSeries, UserId,
};
