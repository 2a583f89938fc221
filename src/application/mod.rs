pub mod api;
pub mod use_cases;

pub use api::*;
pub use use_cases::*;
