use leptos::html::Div;
use leptos::*;

use crate::application;
use crate::domain::{
    assistant::{AssistantPort, BotAction, ChatMessage, Sender, TradeOrder, input_placeholder, reply_to},
    errors::AppError,
    indicators::IndicatorRequest,
    ledger::{LedgerError, TradeReceipt, TradeSide},
    market::{StockAnalysis, Ticker, TimeFilter},
    notifications::Toast,
    session::{Page, User},
};
use crate::global_state::{
    IndicatorPreset, all_tickers, analyzed_ticker, api, chat_log, current_user, dialogue, indicator_preset, stock_data,
};
use crate::presentation::{actions, components::FormattedText};

/// Wires the assistant to the HTTP client and the shared ledger.
struct BotPort {
    user: Option<User>,
}

impl AssistantPort for BotPort {
    async fn fetch_analysis(
        &self,
        ticker: &Ticker,
        period: TimeFilter,
        indicators: &[IndicatorRequest],
    ) -> Result<StockAnalysis, AppError> {
        let analysis = application::fetch_stock_data(api(), ticker, period, Some(indicators)).await?;
        stock_data().set(Some(analysis.clone()));
        analyzed_ticker().set(Some(ticker.clone()));
        Ok(analysis)
    }

    async fn live_price(&self, ticker: &Ticker) -> Result<Option<f64>, AppError> {
        application::live_price(api(), ticker).await
    }

    async fn verify_password(&self, password: &str) -> Result<bool, AppError> {
        match &self.user {
            Some(user) => application::verify_password(api(), user, password).await,
            None => Ok(false),
        }
    }

    fn execute_trade(&self, order: &TradeOrder, price: f64) -> Result<TradeReceipt, LedgerError> {
        let result = match order.side {
            TradeSide::Buy => actions::execute_buy(&order.ticker, order.quantity, price),
            TradeSide::Sell => actions::execute_sell(&order.ticker, order.quantity, price),
        };
        actions::show_toast(Toast::for_trade(&result));
        result
    }
}

/// Run one query through the assistant and apply its reply.
fn submit(query: String, set_typing: WriteSignal<bool>) {
    if query.trim().is_empty() {
        return;
    }
    set_typing.set(true);
    let context = dialogue().get_untracked();
    let tickers = all_tickers().get_untracked();
    let port = BotPort { user: current_user().get_untracked() };
    spawn_local(async move {
        let reply = reply_to(&query, context.as_ref(), &tickers, &port).await;
        set_typing.set(false);

        if !reply.is_silent {
            if let Some(text) = reply.text {
                chat_log().update(|log| {
                    log.push(Sender::Bot, text);
                });
            }
        }
        if let Some(BotAction::NavigateToIndicators { ticker, period, indicators }) = reply.action {
            indicator_preset().set(Some(IndicatorPreset { ticker, period, indicators }));
            actions::navigate(Page::Indicators);
        }
        dialogue().set(reply.context);
    });
}

#[component]
fn MessageBubble(
    message: ChatMessage,
    editing: RwSignal<Option<u64>>,
    edit_text: RwSignal<String>,
    set_typing: WriteSignal<bool>,
) -> impl IntoView {
    let id = message.id;
    let is_user = message.sender == Sender::User;
    let text = message.text.clone();

    let save = move |_| {
        let draft = edit_text.get_untracked();
        let mut resubmit = None;
        chat_log().update(|log| resubmit = log.edit(id, &draft));
        editing.set(None);
        edit_text.set(String::new());
        if let Some(query) = resubmit {
            submit(query, set_typing);
        }
    };
    let cancel = move |_| {
        editing.set(None);
        edit_text.set(String::new());
    };

    let body = move || {
        if editing.get() == Some(id) {
            return view! {
                <div class="edit-row">
                    <input
                        type="text"
                        prop:value=move || edit_text.get()
                        on:input=move |ev| edit_text.set(event_target_value(&ev))
                    />
                    <button class="primary" on:click=save>"Save"</button>
                    <button class="ghost" on:click=cancel>"Cancel"</button>
                </div>
            }
            .into_view();
        }
        let original = text.clone();
        view! {
            <div class=if is_user { "bubble user" } else { "bubble bot" }>
                <p><FormattedText text=text.clone()/></p>
                {message.edited.then(|| view! { <span class="muted small">"(edited)"</span> })}
                {is_user
                    .then(|| {
                        view! {
                            <button
                                class="edit"
                                on:click=move |_| {
                                    edit_text.set(original.clone());
                                    editing.set(Some(id));
                                }
                            >
                                "Edit"
                            </button>
                        }
                    })}
            </div>
        }
        .into_view()
    };

    view! { <div class=if is_user { "message from-user" } else { "message" }>{body}</div> }
}

#[component]
pub fn AssistantPage() -> impl IntoView {
    let input = create_rw_signal(String::new());
    let (typing, set_typing) = create_signal(false);
    let editing = create_rw_signal(None::<u64>);
    let edit_text = create_rw_signal(String::new());
    let end_ref = create_node_ref::<Div>();

    create_effect(move |_| {
        chat_log().with(|_| ());
        typing.get();
        if let Some(end) = end_ref.get() {
            end.scroll_into_view();
        }
    });

    let masked = move || dialogue().with(|c| c.as_ref().is_some_and(|c| c.masks_input()));
    let send = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() || typing.get_untracked() {
            return;
        }
        let shown = if masked() { "•".repeat(text.chars().count()) } else { text.clone() };
        chat_log().update(|log| {
            log.push(Sender::User, shown);
        });
        input.set(String::new());
        submit(text, set_typing);
    };

    view! {
        <div class="card chat">
            <div class="chat-header">
                <h2>"Trading Assistant"</h2>
                <p class="muted small">
                    "Currently analyzing: "
                    <strong>
                        {move || {
                            stock_data()
                                .with(|d| d.as_ref().map(|a| a.ticker.to_string()))
                                .unwrap_or_else(|| "None".to_string())
                        }}
                    </strong>
                </p>
            </div>
            <div class="chat-body">
                <For
                    each=move || chat_log().with(|log| log.messages().to_vec())
                    key=|m| (m.id, m.text.clone(), m.edited)
                    children=move |message| {
                        view! { <MessageBubble message=message editing=editing edit_text=edit_text set_typing=set_typing/> }
                    }
                />
                <Show when=move || typing.get()>
                    <div class="message">
                        <div class="bubble bot typing-indicator"><span></span><span></span><span></span></div>
                    </div>
                </Show>
                <div node_ref=end_ref></div>
            </div>
            <div class="chat-footer">
                <input
                    type=move || if masked() { "password" } else { "text" }
                    placeholder=move || dialogue().with(|c| input_placeholder(c.as_ref()))
                    disabled=move || typing.get()
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            send();
                        }
                    }
                />
                <button class="primary" disabled=move || typing.get() || input.with(String::is_empty) on:click=move |_| send()>
                    "Send"
                </button>
            </div>
        </div>
    }
}
