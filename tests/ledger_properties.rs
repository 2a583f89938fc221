use quickcheck_macros::quickcheck;
use stockiq_dashboard::domain::ledger::{Ledger, LedgerError, TradeSide};
use stockiq_dashboard::domain::market::Ticker;

const RATE: f64 = 83.0;

fn tcs() -> Ticker {
    Ticker::new("TCS.NS").unwrap()
}

fn apple() -> Ticker {
    Ticker::new("AAPL").unwrap()
}

fn price(raw: u16) -> f64 {
    1.0 + raw as f64 / 10.0
}

#[quickcheck]
fn buy_then_sell_at_same_price_restores_funds(qty: u8, raw_price: u16) -> bool {
    let qty = qty as u32 % 50 + 1;
    let price = price(raw_price);
    let mut ledger = Ledger::new(Vec::new(), 1_000_000_000.0);

    ledger.buy(&apple(), qty, price, RATE, 1).unwrap();
    let receipt = ledger.sell(&apple(), qty, price, RATE).unwrap();

    (ledger.funds() - 1_000_000_000.0).abs() < 1e-4
        && ledger.holdings().is_empty()
        && receipt.profit.map(|p| p.abs() < 1e-6).unwrap_or(false)
}

#[quickcheck]
fn merged_position_price_lies_between_fills(a: u16, b: u16, qa: u8, qb: u8) -> bool {
    let (pa, pb) = (price(a), price(b));
    let (qa, qb) = (qa as u32 % 20 + 1, qb as u32 % 20 + 1);
    let mut ledger = Ledger::new(Vec::new(), 1e12);

    ledger.buy(&tcs(), qa, pa, RATE, 1).unwrap();
    ledger.buy(&tcs(), qb, pb, RATE, 2).unwrap();

    let holding = ledger.holding(&tcs()).unwrap();
    let (low, high) = (pa.min(pb), pa.max(pb));
    holding.quantity == qa + qb
        && holding.id == 1
        && holding.purchase_price >= low - 1e-9
        && holding.purchase_price <= high + 1e-9
}

#[quickcheck]
fn rejected_trades_do_not_touch_the_ledger(qty: u8, raw_price: u16) -> bool {
    let qty = qty as u32 % 50 + 1;
    let mut ledger = Ledger::new(Vec::new(), 0.5);
    let before = ledger.clone();

    let buy = ledger.buy(&tcs(), qty, price(raw_price), RATE, 1);
    let sell = ledger.sell(&tcs(), qty, price(raw_price), RATE);

    matches!(buy, Err(LedgerError::InsufficientFunds { .. }))
        && matches!(sell, Err(LedgerError::InsufficientShares { .. }))
        && ledger == before
}

#[test]
fn partial_sell_keeps_the_rest() {
    let mut ledger = Ledger::new(Vec::new(), 100_000.0);
    ledger.buy(&tcs(), 10, 3000.0, RATE, 7).unwrap();

    let receipt = ledger.sell(&tcs(), 4, 3500.0, RATE).unwrap();

    assert_eq!(receipt.side, TradeSide::Sell);
    assert_eq!(receipt.profit, Some(2000.0));
    assert_eq!(ledger.holding(&tcs()).map(|h| h.quantity), Some(6));
    assert_eq!(ledger.funds(), 100_000.0 - 30_000.0 + 14_000.0);
}

#[test]
fn selling_more_than_held_is_refused() {
    let mut ledger = Ledger::new(Vec::new(), 100_000.0);
    ledger.buy(&tcs(), 2, 100.0, RATE, 1).unwrap();

    assert_eq!(
        ledger.sell(&tcs(), 3, 100.0, RATE),
        Err(LedgerError::InsufficientShares { ticker: tcs() })
    );
    assert_eq!(ledger.holding(&tcs()).map(|h| h.quantity), Some(2));
}

#[test]
fn deposit_rejects_non_positive_amounts() {
    let mut ledger = Ledger::new(Vec::new(), 10.0);
    assert_eq!(ledger.deposit(0.0), Err(LedgerError::InvalidAmount));
    assert_eq!(ledger.deposit(f64::NAN), Err(LedgerError::InvalidAmount));
    assert_eq!(ledger.deposit(5.0), Ok(15.0));
}
