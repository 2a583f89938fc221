//! Leptos components and the UI-side state transitions.

pub mod actions;
pub mod charts;
pub mod components;
pub mod pages;
