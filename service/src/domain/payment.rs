//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Money};

use super::{booking, define_id, define_text, Email};

/// Payment of a [`Booking`].
///
/// [`Booking`]: booking::Booking
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Booking`] this [`Payment`] pays.
    ///
    /// [`Booking`]: booking::Booking
    pub booking_id: booking::Id,

    /// Amount of this [`Payment`], equal to the [`Booking`] total price at
    /// the moment of creation.
    ///
    /// [`Booking`]: booking::Booking
    pub amount: Money,

    /// [`Method`] of this [`Payment`].
    pub method: Method,

    /// [`Status`] of this [`Payment`].
    pub status: Status,

    /// Payment ID assigned by the payment gateway, if any.
    pub gateway_payment_id: Option<GatewayPaymentId>,

    /// Transaction ID assigned by the payment gateway, if any.
    pub gateway_transaction_id: Option<GatewayTransactionId>,

    /// [`Description`] of this [`Payment`], if any.
    pub description: Option<Description>,

    /// [`Email`] the invoice of this [`Payment`] is sent to, if any.
    pub invoice_email: Option<Email>,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Payment`] was modified last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] when this [`Payment`] was completed, if it was.
    pub completed_at: Option<CompletionDateTime>,
}

impl Payment {
    /// Moves this [`Payment`] into the provided [`Status`].
    ///
    /// Sets [`Payment::completed_at`] when moving into
    /// [`Status::Completed`].
    ///
    /// # Errors
    ///
    /// With the current [`Status`] if the transition is not allowed.
    pub fn transition(
        &mut self,
        to: Status,
        at: ModificationDateTime,
    ) -> Result<(), Status> {
        if !self.status.can_transition_to(to) {
            return Err(self.status);
        }
        self.status = to;
        self.updated_at = at;
        if to == Status::Completed {
            self.completed_at = Some(at.coerce());
        }
        Ok(())
    }
}

define_id! {
    #[doc = "ID of a [`Payment`]."]
    Id
}

define_text! {
    #[doc = "Opaque payment ID assigned by a payment gateway."]
    GatewayPaymentId(max = 256)
}

define_text! {
    #[doc = "Opaque transaction ID assigned by a payment gateway."]
    GatewayTransactionId(max = 256)
}

define_text! {
    #[doc = "Description of a [`Payment`]."]
    Description(max = 1024)
}

define_kind! {
    #[doc = "Method of a [`Payment`]."]
    enum Method {
        #[doc = "Credit or debit card."]
        Card = 1,

        #[doc = "Bank transfer."]
        BankTransfer = 2,

        #[doc = "MB WAY mobile payment."]
        MbWay = 3,

        #[doc = "PayPal wallet."]
        PayPal = 4,
    }
}

define_kind! {
    #[doc = "Status of a [`Payment`]."]
    enum Status {
        #[doc = "[`Payment`] is created, but not started yet."]
        Pending = 1,

        #[doc = "[`Payment`] is being processed by the payment gateway."]
        Processing = 2,

        #[doc = "[`Payment`] is completed successfully."]
        Completed = 3,

        #[doc = "[`Payment`] has failed and may be retried."]
        Failed = 4,

        #[doc = "[`Payment`] has been cancelled."]
        Cancelled = 5,

        #[doc = "Money of the completed [`Payment`] has been returned."]
        Refunded = 6,
    }
}

impl Status {
    /// Indicates whether a [`Payment`] may be moved from this [`Status`] into
    /// the provided one.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        match self {
            Self::Pending => matches!(
                to,
                Self::Processing
                    | Self::Completed
                    | Self::Failed
                    | Self::Cancelled,
            ),
            Self::Processing => {
                matches!(to, Self::Completed | Self::Failed | Self::Cancelled)
            }
            Self::Failed => matches!(to, Self::Processing | Self::Cancelled),
            Self::Completed => matches!(to, Self::Refunded),
            Self::Cancelled | Self::Refunded => false,
        }
    }
}

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;

/// [`DateTime`] when a [`Payment`] was modified.
pub type ModificationDateTime = DateTimeOf<(Payment, unit::Modification)>;

/// [`DateTime`] when a [`Payment`] was completed.
pub type CompletionDateTime = DateTimeOf<(Payment, unit::Completion)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, DateTime, Money};

    use super::{Id, Method, Payment, Status};
    use crate::domain::booking;

    fn payment() -> Payment {
        let now = DateTime::now();
        Payment {
            id: Id::new(),
            booking_id: booking::Id::new(),
            amount: Money::new(500.into(), Currency::Eur),
            method: Method::Card,
            status: Status::Pending,
            gateway_payment_id: None,
            gateway_transaction_id: None,
            description: None,
            invoice_email: None,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            completed_at: None,
        }
    }

    #[test]
    fn terminal_statuses_have_no_way_out() {
        for to in Status::ALL {
            assert!(!Status::Cancelled.can_transition_to(*to));
            assert!(!Status::Refunded.can_transition_to(*to));
        }
    }

    #[test]
    fn completes_once() {
        let mut p = payment();
        let now = DateTime::now().coerce();

        p.transition(Status::Processing, now).unwrap();
        assert!(p.completed_at.is_none());

        p.transition(Status::Completed, now).unwrap();
        assert_eq!(p.completed_at, Some(now.coerce()));

        assert_eq!(
            p.transition(Status::Completed, now),
            Err(Status::Completed),
        );
        p.transition(Status::Refunded, now).unwrap();
    }

    #[test]
    fn failed_may_be_retried() {
        let mut p = payment();
        let now = DateTime::now().coerce();

        p.transition(Status::Failed, now).unwrap();
        p.transition(Status::Processing, now).unwrap();
        assert_eq!(p.status, Status::Processing);
        assert_eq!(p.transition(Status::Pending, now), Err(Status::Processing));
    }
}
