// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Telegram error: {0}")]
    Telegram(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file could not be parsed: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Candle out of order: {0}")]
    OutOfOrder(String),
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Indicator calculation error: {0}")]
    IndicatorCalculation(String),

    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),
}

/// Rejected chat command input. Each variant maps to the usage line
/// that is sent back to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("/set_config expects 4 arguments, got {0}")]
    SetConfigArity(usize),

    #[error("/set_demo_trade expects 1 argument, got {0}")]
    SetDemoTradeArity(usize),

    #[error("Invalid demo amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid command arguments: {0}")]
    InvalidArguments(String),
}

impl CommandError {
    /// Usage text for the command that failed to parse
    pub fn usage(&self) -> &'static str {
        match self {
            CommandError::SetConfigArity(_) => {
                "Usage: /set_config <email> <password> <email_pass> <user_data_dir>"
            }
            CommandError::SetDemoTradeArity(_) | CommandError::InvalidAmount(_) => {
                "Usage: /set_demo_trade <amount>"
            }
            CommandError::InvalidArguments(_) => "Invalid arguments, see /help for usage.",
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type MarketDataResult<T> = Result<T, MarketDataError>;
pub type AnalysisResult<T> = Result<T, AnalysisError>;
