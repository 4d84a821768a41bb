//! Prediction Market Router — Library Root
//!
//! Routes collateral orders on a binary YES/NO market across vault OTC
//! inventory, a constant-product AMM and a mint fallback.
//!
//! Re-exports all modules for integration tests and benchmarks.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod usecases;

pub use error::RouteError;
pub use usecases::router::{Router, RouterConfig, RouterParams};
