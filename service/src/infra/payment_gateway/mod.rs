//! [`PaymentGateway`]-related implementations.

mod mock;

use common::Money;
use derive_more::{AsRef, Debug, Display, Error as StdError, From};

use crate::domain::{booking, payment};

pub use self::mock::Mock;

/// External payment processor.
///
/// Wire protocols are hidden behind the implementations: the returned IDs are
/// opaque and stored verbatim.
pub use common::Handler as PaymentGateway;

/// Operation of creating a new payment [`Intent`].
#[derive(Clone, Copy, Debug)]
pub struct CreateIntent {
    /// [`Money`] to be charged.
    pub amount: Money,

    /// ID of the [`Payment`] the [`Intent`] is created for.
    ///
    /// [`Payment`]: crate::domain::Payment
    pub payment_id: payment::Id,

    /// ID of the [`Booking`] being paid.
    ///
    /// [`Booking`]: crate::domain::Booking
    pub booking_id: booking::Id,
}

impl CreateIntent {
    /// Returns metadata to be attached to the [`Intent`].
    #[must_use]
    pub fn metadata(&self) -> [(&'static str, String); 2] {
        [
            ("payment_id", self.payment_id.to_string()),
            ("booking_id", self.booking_id.to_string()),
        ]
    }
}

/// Payment intent registered in a [`PaymentGateway`].
#[derive(Clone, Debug)]
pub struct Intent {
    /// ID of this [`Intent`].
    pub id: payment::GatewayPaymentId,

    /// [`ClientSecret`] to finish this [`Intent`] on the client side with.
    pub client_secret: ClientSecret,

    /// Gateway-specific status of this [`Intent`].
    pub status: String,
}

/// Secret allowing a client to finish an [`Intent`].
#[derive(AsRef, Clone, Debug, Display, From)]
#[as_ref(str)]
#[debug("ClientSecret(***)")]
pub struct ClientSecret(String);

/// Operation of confirming an [`Intent`].
#[derive(Clone, Debug)]
pub struct ConfirmIntent {
    /// ID of the [`Intent`] to confirm.
    pub intent_id: payment::GatewayPaymentId,
}

/// Outcome of an [`Intent`] confirmation.
#[derive(Clone, Debug)]
pub struct Confirmation {
    /// Indicator whether the money has been charged.
    pub success: bool,

    /// ID of the charging transaction, if any.
    pub transaction_id: Option<payment::GatewayTransactionId>,
}

/// [`PaymentGateway`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`PaymentGateway`] is not reachable.
    #[display("Payment gateway is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),

    /// [`PaymentGateway`] has rejected the request.
    #[display("Payment gateway rejected the request: {_0}")]
    #[from(ignore)]
    Rejected(#[error(not(source))] String),
}
