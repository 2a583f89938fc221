//! Rule-based trading assistant.
//!
//! [`reply_to`] resolves one user message against the pending
//! [`DialogueContext`] and returns the next context along with the reply.
//! Everything that needs the network or the ledger goes through
//! [`AssistantPort`]; the dialogue holds no browser types.

pub mod chat;
pub mod dialogue;
pub mod intent;

pub use chat::{ChatLog, ChatMessage, Segment, Sender, WELCOME_MESSAGE, segments};
pub use dialogue::{DialogueContext, PriceChoice, TradeOrder, input_placeholder};
pub use intent::{Intent, normalize, parse_intent};

use crate::domain::errors::AppError;
use crate::domain::indicators::IndicatorRequest;
use crate::domain::ledger::{LedgerError, TradeReceipt, TradeSide};
use crate::domain::logging::LogComponent;
use crate::domain::market::{StockAnalysis, Ticker, TimeFilter};
use crate::{log_info, log_warn};

const GREETING_REPLY: &str = "Hello! How can I assist you with your analysis today?";
const ACKNOWLEDGEMENT_REPLY: &str = "You're welcome! Is there anything else I can help with?";
const UNKNOWN_REPLY: &str = "I'm not sure how to answer that. You can say 'analyze reliance' or 'buy 10 shares of tcs'.";
const NO_INDICATORS_REPLY: &str = "I couldn't find any valid indicators. Please try again (e.g., 'rsi and macd').";
const GRAPH_DECLINED_REPLY: &str = "Alright. Let me know if you need anything else!";
const UNCLEAR_PRICE_REPLY: &str =
    "I didn't understand. Do you want to trade at the market price or a specific limit price (e.g., 'at 55.50')?";
const NO_MARKET_PRICE_REPLY: &str = "Sorry, I couldn't fetch the current market price. Please try again.";
const WRONG_PASSWORD_REPLY: &str = "❌ Password incorrect. Your trade has been cancelled for security.";
const TRADE_FAILED_REPLY: &str = "⚠️ Your trade could not be completed. Please check your holdings or funds.";
const VERIFY_FAILED_REPLY: &str = "Sorry, I couldn't verify your password right now. Your trade has been cancelled.";

/// Period used when the assistant analyses a stock.
pub const ANALYSIS_PERIOD: TimeFilter = TimeFilter::OneMonth;

/// Services the assistant needs from the rest of the app.
#[allow(async_fn_in_trait)]
pub trait AssistantPort {
    async fn fetch_analysis(
        &self,
        ticker: &Ticker,
        period: TimeFilter,
        indicators: &[IndicatorRequest],
    ) -> Result<StockAnalysis, AppError>;

    /// Live price, `None` when the quote is missing or zero.
    async fn live_price(&self, ticker: &Ticker) -> Result<Option<f64>, AppError>;

    async fn verify_password(&self, password: &str) -> Result<bool, AppError>;

    fn execute_trade(&self, order: &TradeOrder, price: f64) -> Result<TradeReceipt, LedgerError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotAction {
    NavigateToIndicators {
        ticker: Ticker,
        period: TimeFilter,
        indicators: Vec<IndicatorRequest>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BotReply {
    pub text: Option<String>,
    /// Context for the next message; `None` ends the dialogue.
    pub context: Option<DialogueContext>,
    pub action: Option<BotAction>,
    /// Silent replies add nothing to the transcript.
    pub is_silent: bool,
}

impl BotReply {
    fn say(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }

    fn ask(text: impl Into<String>, context: DialogueContext) -> Self {
        Self { text: Some(text.into()), context: Some(context), ..Self::default() }
    }
}

/// Answer one message. `query` is the raw text as typed.
pub async fn reply_to<P: AssistantPort>(
    query: &str,
    context: Option<&DialogueContext>,
    tickers: &[Ticker],
    port: &P,
) -> BotReply {
    let text = query.trim().to_lowercase();

    match context {
        Some(DialogueContext::AwaitingIndicators { ticker, period }) => {
            indicators_reply(&text, ticker, *period, context, port).await
        }
        Some(DialogueContext::AwaitingGraphConfirmation { ticker, period, indicators }) => {
            if dialogue::is_graph_confirmation(&text) {
                BotReply {
                    action: Some(BotAction::NavigateToIndicators {
                        ticker: ticker.clone(),
                        period: *period,
                        indicators: indicators.clone(),
                    }),
                    is_silent: true,
                    ..BotReply::default()
                }
            } else {
                BotReply::say(GRAPH_DECLINED_REPLY)
            }
        }
        Some(DialogueContext::ConfirmTrade { order }) => price_reply(&text, order, context, port).await,
        Some(DialogueContext::AwaitingPassword { order }) => password_reply(query, order, port).await,
        None => intent_reply(query, tickers, port).await,
    }
}

async fn intent_reply<P: AssistantPort>(query: &str, tickers: &[Ticker], port: &P) -> BotReply {
    match parse_intent(query, tickers) {
        Intent::Greeting => BotReply::say(GREETING_REPLY),
        Intent::Acknowledgement => BotReply::say(ACKNOWLEDGEMENT_REPLY),
        Intent::InitiateAnalysis(ticker) => BotReply::ask(
            format!(
                "Alright, analyzing **{}**. Which indicators would you like to see? (e.g., RSI, MACD, or all)",
                ticker
            ),
            DialogueContext::AwaitingIndicators { ticker, period: ANALYSIS_PERIOD },
        ),
        Intent::InitiateTrade(order) => BotReply::ask(
            format!(
                "Okay, {} share(s) of {}. At what price? You can say **market price** or a specific limit price (e.g., **at 161.50**).",
                order.quantity, order.ticker
            ),
            DialogueContext::ConfirmTrade { order },
        ),
        Intent::GetPrice(ticker) => match port.live_price(&ticker).await {
            Ok(Some(price)) => BotReply::say(format!(
                "The current price of **{}** is **{}{:.2}**.",
                ticker,
                ticker.currency().symbol(),
                price
            )),
            Ok(None) | Err(_) => BotReply::say(format!("Sorry, I couldn't fetch the live price for {}.", ticker)),
        },
        Intent::Unknown => BotReply::say(UNKNOWN_REPLY),
    }
}

async fn indicators_reply<P: AssistantPort>(
    text: &str,
    ticker: &Ticker,
    period: TimeFilter,
    context: Option<&DialogueContext>,
    port: &P,
) -> BotReply {
    let requested = dialogue::requested_indicators(text);
    if requested.is_empty() {
        return BotReply { text: Some(NO_INDICATORS_REPLY.to_string()), context: context.cloned(), ..BotReply::default() };
    }

    let analysis = match port.fetch_analysis(ticker, period, &requested).await {
        Ok(analysis) => analysis,
        Err(err) => {
            log_warn!(LogComponent::Domain("Assistant"), "analysis for {} failed: {}", ticker, err);
            return BotReply::say(format!("Sorry, I couldn't fetch the data for {}. Please try again later.", ticker));
        }
    };
    let Some(latest) = analysis.latest_point() else {
        return BotReply::say(format!("Sorry, I couldn't fetch the data for {}. Please try again later.", ticker));
    };

    let mut reply = format!("Here are the latest values for **{}**:\n", ticker);
    for request in &requested {
        let prefix = request.name.column_prefix().to_uppercase();
        let column = latest.column_names().find(|key| key.to_uppercase().starts_with(&prefix));
        if let Some((key, value)) = column.and_then(|key| latest.indicator(key).map(|v| (key, v))) {
            reply.push_str(&format!("\n- **{}**: {:.2}", key, value));
        }
    }
    reply.push_str("\n\nWould you like to see this on a graph?");

    BotReply::ask(
        reply,
        DialogueContext::AwaitingGraphConfirmation { ticker: ticker.clone(), period, indicators: requested },
    )
}

async fn price_reply<P: AssistantPort>(
    text: &str,
    order: &TradeOrder,
    context: Option<&DialogueContext>,
    port: &P,
) -> BotReply {
    let symbol = order.ticker.currency().symbol();
    match dialogue::parse_price_choice(text) {
        PriceChoice::Market => match port.live_price(&order.ticker).await {
            Ok(Some(price)) => BotReply::ask(
                format!(
                    "The current market price is {}{:.2}. Please enter your password to confirm this trade.",
                    symbol, price
                ),
                DialogueContext::AwaitingPassword { order: order.at_price(price) },
            ),
            Ok(None) | Err(_) => BotReply::say(NO_MARKET_PRICE_REPLY),
        },
        PriceChoice::Limit(price) => BotReply::ask(
            format!(
                "Okay, I will set a limit order for {} shares at {}{:.2}. Please enter your password to confirm.",
                order.quantity, symbol, price
            ),
            DialogueContext::AwaitingPassword { order: order.at_price(price) },
        ),
        PriceChoice::Unclear => {
            BotReply { text: Some(UNCLEAR_PRICE_REPLY.to_string()), context: context.cloned(), ..BotReply::default() }
        }
    }
}

async fn password_reply<P: AssistantPort>(password: &str, order: &TradeOrder, port: &P) -> BotReply {
    match port.verify_password(password).await {
        Ok(true) => {
            let Some(price) = order.price else {
                return BotReply::say(TRADE_FAILED_REPLY);
            };
            match port.execute_trade(order, price) {
                Ok(receipt) => {
                    log_info!(
                        LogComponent::Domain("Assistant"),
                        "{} {} {} @ {:.2}",
                        receipt.side,
                        receipt.quantity,
                        receipt.ticker,
                        receipt.price
                    );
                    let side = match order.side {
                        TradeSide::Buy => "buy",
                        TradeSide::Sell => "sell",
                    };
                    BotReply::say(format!(
                        "✅ Trade confirmed! Your order to {} {} {} has been executed.",
                        side, order.quantity, order.ticker
                    ))
                }
                Err(err) => {
                    log_warn!(LogComponent::Domain("Assistant"), "trade rejected: {}", err);
                    BotReply::say(TRADE_FAILED_REPLY)
                }
            }
        }
        Ok(false) => BotReply::say(WRONG_PASSWORD_REPLY),
        Err(err) => {
            log_warn!(LogComponent::Domain("Assistant"), "password check failed: {}", err);
            BotReply::say(VERIFY_FAILED_REPLY)
        }
    }
}
