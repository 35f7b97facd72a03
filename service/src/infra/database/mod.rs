//! [`Database`]-related implementations.

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "memory")]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// Name of the unique constraint allowing a single payment per booking.
pub const PAYMENT_PER_BOOKING: &str = "payments_booking_id_key";

/// Name of the unique constraint allowing a single booking per proposal.
pub const BOOKING_PER_PROPOSAL: &str = "bookings_proposal_id_key";

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "memory")]
    /// [`Memory`] error.
    Memory(memory::Error),

    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Checks if this [`Error`] is a violation of the specified unique
    /// constraint.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(e) => e.is_unique_violation(constraint),
            #[cfg(feature = "postgres")]
            Self::Postgres(e) => e.is_unique_violation(Some(constraint)),
        }
    }
}
