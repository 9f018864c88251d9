//! Action-value model for tilerl implemented with
//! [candle](https://crates.io/crates/candle-core).
pub mod mlp;
pub mod opt;
mod qnet;
pub use qnet::{QNetwork, QNetworkConfig};
