use crate::application::api::{
    AnalysisRequest, Credentials, ExchangeRate, PasswordCheck, PortfolioRequest, StockApi, TransactionLog,
};
use crate::domain::{
    backtest::{BacktestReport, BacktestRequest},
    errors::{AppError, ApiResult},
    ledger::Transaction,
    logging::LogComponent,
    market::{NewsItem, Prediction, QuoteBook, StockAnalysis, Ticker},
    session::User,
};
use crate::{log_debug, log_error};
use gloo_net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON client for the StockIQ backend, built on gloo-net.
#[derive(Debug, Clone)]
pub struct HttpStockApi {
    base_url: String,
}

impl HttpStockApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        let url = self.url(endpoint);
        log_debug!(LogComponent::Infrastructure("HTTP"), "GET {}", url);

        let response = Request::get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("GET {}: {}", url, e)))?;
        Self::decode(ensure_success(response).await?).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> ApiResult<T> {
        let response = self.post(endpoint, body).await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> ApiResult<Response> {
        let url = self.url(endpoint);
        log_debug!(LogComponent::Infrastructure("HTTP"), "POST {}", url);

        let response = Request::post(&url)
            .json(body)
            .map_err(|e| AppError::DecodeError(format!("request body for {}: {}", url, e)))?
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("POST {}: {}", url, e)))?;
        ensure_success(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::DecodeError(format!("{}: {}", response.url(), e)))
    }
}

/// Turn a non-2xx response into [`AppError::ApiError`], keeping the
/// server's `detail` message when there is one.
async fn ensure_success(response: Response) -> ApiResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body);
    log_error!(
        LogComponent::Infrastructure("HTTP"),
        "{} {} {}",
        status,
        response.url(),
        detail.as_deref().unwrap_or("<no detail>")
    );
    Err(AppError::ApiError { status, detail })
}

/// `detail` of a FastAPI error body. Validation errors carry a list; the
/// first entry's `msg` is used.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

impl StockApi for HttpStockApi {
    async fn analyze(&self, request: &AnalysisRequest) -> ApiResult<StockAnalysis> {
        self.post_json("/analyze", request).await
    }

    async fn predict(&self, ticker: &Ticker) -> ApiResult<Prediction> {
        self.get_json(&HttpUtils::with_query("/predict", &[("ticker", ticker.value())])).await
    }

    async fn portfolio_data(&self, tickers: &[Ticker]) -> ApiResult<QuoteBook> {
        self.post_json("/portfolio-data", &PortfolioRequest { tickers }).await
    }

    async fn market_indices(&self) -> ApiResult<QuoteBook> {
        self.get_json("/market-indices").await
    }

    async fn all_tickers(&self) -> ApiResult<Vec<String>> {
        self.get_json("/get_all_tickers").await
    }

    async fn exchange_rate(&self) -> ApiResult<ExchangeRate> {
        self.get_json("/get-exchange-rate").await
    }

    async fn general_news(&self) -> ApiResult<Vec<NewsItem>> {
        self.get_json("/general-news").await
    }

    async fn signup(&self, credentials: &Credentials) -> ApiResult<()> {
        self.post("/signup", credentials).await.map(|_| ())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<User> {
        self.post_json("/login", credentials).await
    }

    async fn verify_password(&self, credentials: &Credentials) -> ApiResult<bool> {
        self.post_json::<_, PasswordCheck>("/verify-password", credentials)
            .await
            .map(|check| check.verified)
    }

    async fn log_transaction(&self, username: &str, transaction: &Transaction) -> ApiResult<()> {
        self.post("/log-transaction", &TransactionLog { username, transaction }).await.map(|_| ())
    }

    async fn transactions(&self, username: &str) -> ApiResult<Vec<Transaction>> {
        self.get_json(&HttpUtils::with_query("/get-transactions", &[("username", username)])).await
    }

    async fn backtest(&self, request: &BacktestRequest) -> ApiResult<BacktestReport> {
        self.post_json("/backtest", request).await
    }

    fn export_url(&self, ticker: &Ticker, start_date: &str, end_date: &str) -> String {
        self.url(&HttpUtils::with_query(
            "/export",
            &[("ticker", ticker.value()), ("startDate", start_date), ("endDate", end_date)],
        ))
    }
}

/// Query-string helpers
pub struct HttpUtils;

impl HttpUtils {
    pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return path.to_string();
        }
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, Self::url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", path, query)
    }

    /// Percent-encode everything outside the unreserved set.
    pub fn url_encode(input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
                other => out.push_str(&format!("%{:02X}", other)),
            }
        }
        out
    }
}
