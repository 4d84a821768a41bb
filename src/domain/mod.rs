//! Domain layer - Pricing and routing primitives.
//!
//! Pure, synchronous computations over market snapshots: the AMM fee
//! curve, constant-product swaps, the impact-bounded search and vault OTC
//! pricing. Nothing here performs I/O or holds hidden state.

pub mod amm_pool;
pub mod amount;
pub mod fee_model;
pub mod market;
pub mod price_impact;
pub mod trade;
pub mod vault;

// Re-export core types for convenience
pub use amm_pool::{AmmPool, AmmQuote, INFEASIBLE_IMPACT_BPS};
pub use amount::{Amount, Bps};
pub use fee_model::{FeeBreakdown, FeeModel, FeeSchedule};
pub use market::{PoolState, Side, TradeRequest, VaultState};
pub use price_impact::PriceImpactBounder;
pub use trade::{RejectionReason, TradeResult, VenueFill, VenueKind};
pub use vault::{OtcQuote, SpreadQuote, VaultInventory, VaultParams};
