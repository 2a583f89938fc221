//! Browser adapters: HTTP client, local storage, console logging and the
//! canvas chart renderer.

pub mod config;
pub mod http;
pub mod rendering;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use http::HttpStockApi;
