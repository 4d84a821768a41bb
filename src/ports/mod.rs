//! Ports Layer - Routing Boundaries
//!
//! Defines the interfaces the router requires from its liquidity
//! sources. Concrete venues (vault OTC, AMM, mint) implement them in
//! the use case layer; tests can substitute their own.

pub mod venue;

pub use venue::{FillOutcome, SkipReason, Venue};
