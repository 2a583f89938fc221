use std::time::Duration;

use super::ledger::{LedgerResult, TradeReceipt, TradeSide};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: ToastKind::Success }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), kind: ToastKind::Error }
    }

    /// Outcome of an order placed through the assistant.
    pub fn for_trade(result: &LedgerResult<TradeReceipt>) -> Self {
        match result {
            Ok(receipt) => {
                let verb = match receipt.side {
                    TradeSide::Buy => "bought",
                    TradeSide::Sell => "sold",
                };
                Self::success(format!("Successfully {} {} share(s) of {}!", verb, receipt.quantity, receipt.ticker))
            }
            Err(err) => Self::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{Ledger, LedgerError};
    use crate::domain::market::Ticker;

    #[test]
    fn trade_toasts() {
        let tcs = Ticker::new("TCS.NS").unwrap();
        let mut ledger = Ledger::new(Vec::new(), 1_000.0);

        let bought = Toast::for_trade(&ledger.buy(&tcs, 2, 100.0, 83.0, 1));
        assert_eq!(bought, Toast::success("Successfully bought 2 share(s) of TCS.NS!"));

        let oversold = Toast::for_trade(&ledger.sell(&tcs, 5, 100.0, 83.0));
        assert_eq!(oversold.kind, ToastKind::Error);
        assert_eq!(oversold.message, "You don't own enough shares of TCS.NS to sell.");

        let broke = Toast::for_trade(&Err(LedgerError::InsufficientFunds { needed: 3_500.0 }));
        assert_eq!(broke, Toast::error("Insufficient funds. You need ₹3500.00."));
    }
}
