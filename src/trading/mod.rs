pub mod state;

pub use state::{Execution, TradeMode, TradingStates, UserTradingState};
