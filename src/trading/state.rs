// src/trading/state.rs
use crate::domain::models::{DemoAmount, UserId};
use dashmap::DashMap;

/// Per-user trading flags
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UserTradingState {
    pub auto_trade: bool,
    pub demo_trade: bool,
    /// Kept after demo mode ends; only read while `demo_trade` is set
    pub demo_amount: f64,
}

/// Where a trade request is routed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeMode {
    Demo { amount: f64 },
    Live,
}

/// Whether signals are acted on or only reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Automatic,
    SignalsOnly,
}

impl UserTradingState {
    /// Flip auto trading and return the new value
    pub fn toggle_auto_trade(&mut self) -> bool {
        self.auto_trade = !self.auto_trade;
        self.auto_trade
    }

    pub fn set_demo_trade(&mut self, amount: DemoAmount) {
        self.demo_trade = true;
        self.demo_amount = amount.value();
    }

    pub fn trade_mode(&self) -> TradeMode {
        if self.demo_trade {
            TradeMode::Demo {
                amount: self.demo_amount,
            }
        } else {
            TradeMode::Live
        }
    }

    pub fn execution(&self) -> Execution {
        if self.auto_trade {
            Execution::Automatic
        } else {
            Execution::SignalsOnly
        }
    }
}

/// In-memory map from user to trading state.
///
/// Mutations run while holding the user's entry, so commands from the
/// same user cannot interleave. Nothing is persisted.
#[derive(Debug, Default)]
pub struct TradingStates {
    states: DashMap<UserId, UserTradingState>,
}

impl TradingStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for `user`, defaults if never touched
    pub fn get(&self, user: UserId) -> UserTradingState {
        self.states
            .get(&user)
            .map(|state| *state)
            .unwrap_or_default()
    }

    pub fn toggle_auto_trade(&self, user: UserId) -> bool {
        self.states.entry(user).or_default().toggle_auto_trade()
    }

    pub fn set_demo_trade(&self, user: UserId, amount: DemoAmount) -> UserTradingState {
        let mut state = self.states.entry(user).or_default();
        state.set_demo_trade(amount);
        *state
    }
}
