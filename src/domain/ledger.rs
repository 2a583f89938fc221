//! Simulated trading ledger: holdings plus a rupee cash balance.
//!
//! Prices are stored in the ticker's own currency; every cash movement is
//! converted to INR with the current USD/INR rate.

use crate::domain::market::{Quote, QuoteBook, Ticker};
use crate::time_utils;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum LedgerError {
    #[display(fmt = "Please enter a valid quantity.")]
    InvalidQuantity,
    #[display(fmt = "Please enter a valid price.")]
    InvalidPrice,
    #[display(fmt = "Insufficient funds. You need ₹{:.2}.", needed)]
    InsufficientFunds { needed: f64 },
    #[display(fmt = "You don't own enough shares of {} to sell.", ticker)]
    InsufficientShares { ticker: Ticker },
    #[display(fmt = "Please enter a valid amount.")]
    InvalidAmount,
    #[display(fmt = "Withdrawal amount cannot exceed available funds.")]
    WithdrawExceedsFunds,
}

impl std::error::Error for LedgerError {}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// One position. `id` is the epoch-millisecond time of the first buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: u64,
    pub ticker: Ticker,
    pub quantity: u32,
    #[serde(rename = "purchasePrice")]
    pub purchase_price: f64,
}

impl Holding {
    pub fn invested_inr(&self, usd_inr: f64) -> f64 {
        self.purchase_price * self.quantity as f64 * self.ticker.inr_rate(usd_inr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Row of the transaction history, as stored by `/log-transaction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub ticker: Ticker,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: String,
}

impl Transaction {
    pub fn total(&self) -> f64 {
        self.quantity * self.price
    }
}

/// Outcome of an executed trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub side: TradeSide,
    pub ticker: Ticker,
    pub quantity: u32,
    /// Per-share price in the ticker's currency.
    pub price: f64,
    /// Cash moved, in INR.
    pub amount_inr: f64,
    /// Realised profit in INR, sells only.
    pub profit: Option<f64>,
}

impl TradeReceipt {
    pub fn to_transaction(&self, timestamp: String) -> Transaction {
        Transaction {
            side: self.side,
            ticker: self.ticker.clone(),
            quantity: self.quantity as f64,
            price: self.price,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioMetrics {
    pub total_invested: f64,
    pub total_pl: f64,
    pub today_pl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldingPnl {
    pub invested: f64,
    pub current_price: f64,
    pub pnl: f64,
}

impl HoldingPnl {
    pub fn is_profit(&self) -> bool {
        self.pnl >= 0.0
    }
}

pub fn cost_in_inr(ticker: &Ticker, price: f64, quantity: u32, usd_inr: f64) -> f64 {
    price * quantity as f64 * ticker.inr_rate(usd_inr)
}

/// Per-row P/L for the portfolio page. Without a positive live price the
/// P/L is reported as zero rather than a full loss.
pub fn holding_pnl(holding: &Holding, quote: Option<&Quote>, usd_inr: f64) -> HoldingPnl {
    let invested = holding.invested_inr(usd_inr);
    let current_price = quote.map(|q| q.current_price).unwrap_or(0.0);
    let pnl = if current_price > 0.0 {
        cost_in_inr(&holding.ticker, current_price, holding.quantity, usd_inr) - invested
    } else {
        0.0
    };
    HoldingPnl { invested, current_price, pnl }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    holdings: Vec<Holding>,
    funds: f64,
}

impl Ledger {
    pub fn new(holdings: Vec<Holding>, funds: f64) -> Self {
        Self { holdings, funds }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn funds(&self) -> f64 {
        self.funds
    }

    pub fn holding(&self, ticker: &Ticker) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.ticker == ticker)
    }

    pub fn owns(&self, ticker: &Ticker) -> bool {
        self.holding(ticker).is_some()
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.holdings.iter().map(|h| h.ticker.clone()).collect()
    }

    /// Buy `quantity` shares at `price`. An existing position is merged and
    /// its purchase price becomes the quantity-weighted average.
    pub fn buy(&mut self, ticker: &Ticker, quantity: u32, price: f64, usd_inr: f64, id: u64) -> LedgerResult<TradeReceipt> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(LedgerError::InvalidPrice);
        }
        let cost = cost_in_inr(ticker, price, quantity, usd_inr);
        if cost > self.funds {
            return Err(LedgerError::InsufficientFunds { needed: cost });
        }

        match self.holdings.iter_mut().find(|h| &h.ticker == ticker) {
            Some(existing) => {
                let total = existing.quantity + quantity;
                existing.purchase_price =
                    (existing.purchase_price * existing.quantity as f64 + price * quantity as f64) / total as f64;
                existing.quantity = total;
            }
            None => self.holdings.push(Holding {
                id,
                ticker: ticker.clone(),
                quantity,
                purchase_price: price,
            }),
        }
        self.funds -= cost;

        Ok(TradeReceipt {
            side: TradeSide::Buy,
            ticker: ticker.clone(),
            quantity,
            price,
            amount_inr: cost,
            profit: None,
        })
    }

    /// Sell part or all of a position at `price`; a fully sold position is removed.
    pub fn sell(&mut self, ticker: &Ticker, quantity: u32, price: f64, usd_inr: f64) -> LedgerResult<TradeReceipt> {
        if quantity == 0 {
            return Err(LedgerError::InvalidQuantity);
        }
        if !price.is_finite() || price < 0.0 {
            return Err(LedgerError::InvalidPrice);
        }
        let position = self
            .holdings
            .iter()
            .position(|h| &h.ticker == ticker && h.quantity >= quantity)
            .ok_or_else(|| LedgerError::InsufficientShares { ticker: ticker.clone() })?;

        let sale = cost_in_inr(ticker, price, quantity, usd_inr);
        let basis = cost_in_inr(ticker, self.holdings[position].purchase_price, quantity, usd_inr);

        if self.holdings[position].quantity == quantity {
            self.holdings.remove(position);
        } else {
            self.holdings[position].quantity -= quantity;
        }
        self.funds += sale;

        Ok(TradeReceipt {
            side: TradeSide::Sell,
            ticker: ticker.clone(),
            quantity,
            price,
            amount_inr: sale,
            profit: Some(sale - basis),
        })
    }

    pub fn deposit(&mut self, amount: f64) -> LedgerResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount);
        }
        self.funds += amount;
        Ok(self.funds)
    }

    pub fn withdraw(&mut self, amount: f64) -> LedgerResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.funds {
            return Err(LedgerError::WithdrawExceedsFunds);
        }
        self.funds -= amount;
        Ok(self.funds)
    }

    /// Portfolio totals in INR. Holdings without a quote are left out.
    pub fn valuation(&self, quotes: &QuoteBook, usd_inr: f64) -> PortfolioMetrics {
        self.holdings
            .iter()
            .filter_map(|h| quotes.get(h.ticker.value()).map(|q| (h, q)))
            .fold(PortfolioMetrics::default(), |mut acc, (holding, quote)| {
                let rate = holding.ticker.inr_rate(usd_inr);
                let qty = holding.quantity as f64;
                let invested = holding.purchase_price * qty * rate;
                acc.total_invested += invested;
                acc.total_pl += quote.current_price * qty * rate - invested;
                acc.today_pl += quote.change * qty * rate;
                acc
            })
    }

    /// History shown to practice users, who have no server log: one BUY per
    /// holding, newest first.
    pub fn derived_history(&self) -> Vec<Transaction> {
        self.holdings
            .iter()
            .rev()
            .map(|h| Transaction {
                side: TradeSide::Buy,
                ticker: h.ticker.clone(),
                quantity: h.quantity as f64,
                price: h.purchase_price,
                timestamp: time_utils::format_iso(h.id as i64),
            })
            .collect()
    }
}
