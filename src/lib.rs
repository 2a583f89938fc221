//! StockIQ: a stock dashboard with charts, a simulated ledger and a
//! rule-based trading assistant, compiled to WebAssembly.

use leptos::*;
use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod domain;
pub mod global_state;
pub mod infrastructure;
pub mod macros;
pub mod presentation;
pub mod time_utils;

/// Install logging and the clock, then mount the app.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    domain::logging::init_logger(Box::new(infrastructure::services::ConsoleLogger::for_build()));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "StockIQ starting");

    mount_to_body(|| {
        presentation::actions::apply_theme(presentation::actions::initial_theme());
        view! { <app::App/> }
    });
}
