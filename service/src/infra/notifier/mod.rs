//! [`Notifier`]-related implementations.

mod log;

use derive_more::{Display, Error as StdError, From};

use crate::domain::{supplier, Booking, Email, Proposal, Rfq};

pub use self::log::Log;

/// Delivery of [`Event`]s to the interested parties.
///
/// Delivery is fire-and-forget: a failed one is never retried and never
/// affects the already committed changes it reports about.
pub use common::Handler as Notifier;

/// Event worth notifying the interested parties about.
#[derive(Clone, Debug)]
pub enum Event {
    /// New [`Rfq`] is created.
    RfqCreated {
        /// Created [`Rfq`].
        rfq: Rfq,
    },

    /// [`Proposal`] is received for an [`Rfq`].
    ProposalReceived {
        /// Received [`Proposal`].
        proposal: Proposal,

        /// [`Rfq`] the [`Proposal`] answers.
        rfq: Rfq,
    },

    /// [`Proposal`] is accepted by the company.
    ProposalAccepted {
        /// Accepted [`Proposal`].
        proposal: Proposal,

        /// [`Email`] of the supplier made the [`Proposal`].
        supplier_email: Email,
    },

    /// [`Booking`] is confirmed by its payment.
    BookingConfirmed {
        /// Confirmed [`Booking`].
        booking: Booking,

        /// [`Email`] of the company made the [`Booking`].
        company_email: Email,

        /// Name of the supplier providing the booked activity, if known.
        supplier_name: Option<supplier::Name>,
    },
}

impl Event {
    /// Returns the short name of this [`Event`] kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RfqCreated { .. } => "rfq_created",
            Self::ProposalReceived { .. } => "proposal_received",
            Self::ProposalAccepted { .. } => "proposal_accepted",
            Self::BookingConfirmed { .. } => "booking_confirmed",
        }
    }
}

/// [`Notifier`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Event`] cannot be delivered.
    #[display("Failed to deliver notification: {_0}")]
    Delivery(#[error(not(source))] String),
}
