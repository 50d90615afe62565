mod yahoo;

pub use yahoo::{YahooAdapter, YahooSession};
