use leptos::*;

use crate::application::StockApi;
use crate::domain::{logging::LogComponent, market::NewsItem};
use crate::global_state::{api, stock_data};
use crate::log_error;
use crate::presentation::components::AlertBox;

/// News for the analysed stock, or market-wide headlines when none is loaded.
#[component]
pub fn NewsPage() -> impl IntoView {
    let (general, set_general) = create_signal(Vec::<NewsItem>::new());
    let (loading, set_loading) = create_signal(false);

    create_effect(move |_| {
        if stock_data().with(Option::is_some) {
            set_loading.set(false);
            return;
        }
        set_loading.set(true);
        spawn_local(async move {
            match api().general_news().await {
                Ok(items) => set_general.set(items),
                Err(err) => log_error!(LogComponent::Presentation("News"), "general news unavailable: {}", err),
            }
            set_loading.set(false);
        });
    });

    move || {
        if loading.get() {
            return view! { <div class="card skeleton"></div> }.into_view();
        }
        let (title, items) = stock_data().with(|data| match data {
            Some(analysis) => (format!("Latest News for {}", analysis.ticker), analysis.news.clone()),
            None => ("Latest Financial News".to_string(), general.get()),
        });
        if items.is_empty() {
            return view! { <AlertBox title="News" message="No news available at the moment."/> }.into_view();
        }
        view! {
            <div class="card">
                <h2>{title}</h2>
                <div class="stack">
                    {items
                        .into_iter()
                        .map(|item| {
                            view! {
                                <a class="news-item" href=item.link target="_blank" rel="noopener noreferrer">
                                    <h3>{item.title}</h3>
                                    <p class="muted small">{format!("{} - ", item.summary)}<strong>{item.date}</strong></p>
                                </a>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        }
        .into_view()
    }
}
