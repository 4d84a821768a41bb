//! Use Cases Layer - Routing Workflows
//!
//! Orchestrates domain pricing with the venue port to implement the
//! router's workflows.
//!
//! Use cases:
//! - `Router`: OTC → AMM → Mint sequencing of a single order
//! - `venues`: concrete venue handlers over vault, pool and mint
//! - `Simulation`: liquidity scenario sweeps for analysis

pub mod router;
pub mod simulation;
pub mod venues;
