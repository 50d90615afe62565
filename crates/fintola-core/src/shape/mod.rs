//! Reshaping of provider data into the response bodies.

mod chart;
mod quote;

pub use chart::shape_chart;
pub use quote::shape_quote;
