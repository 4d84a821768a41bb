//! Errors surfaced by the router to its caller.
//!
//! Venue-level infeasibility is a routing outcome, not an error: the router
//! moves on to the next venue. Only malformed requests and venue contract
//! breaches reach the caller, and no partial result accompanies them.

use thiserror::Error;

use crate::domain::amount::{Amount, Bps};
use crate::domain::trade::VenueKind;

/// Failure of a routing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Collateral must be positive.
    #[error("collateral amount must be positive")]
    InvalidAmount,

    /// TWAP probability outside `0..=10000`.
    #[error("TWAP probability {0} bps is outside 0..=10000")]
    InvalidProbability(Bps),

    /// A venue reported consuming more collateral than was left.
    #[error("{venue} venue consumed {used} units with only {remaining} remaining")]
    VenueOverfill {
        venue: VenueKind,
        used: Amount,
        remaining: Amount,
    },
}

impl RouteError {
    /// Stable machine-readable code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidProbability(_) => "INVALID_PROBABILITY",
            Self::VenueOverfill { .. } => "VENUE_OVERFILL",
        }
    }
}

/// Result alias for routing calls.
pub type Result<T> = std::result::Result<T, RouteError>;
