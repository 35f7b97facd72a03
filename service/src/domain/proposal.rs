//! [`Proposal`] definitions.

use std::time::Duration;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};

use super::{activity, define_id, define_text, rfq, supplier, Minutes};

/// Offer of a supplier answering an [`Rfq`].
///
/// [`Rfq`]: rfq::Rfq
#[derive(Clone, Debug)]
pub struct Proposal {
    /// ID of this [`Proposal`].
    pub id: Id,

    /// ID of the [`Rfq`] this [`Proposal`] answers.
    ///
    /// [`Rfq`]: rfq::Rfq
    pub rfq_id: rfq::Id,

    /// ID of the supplier made this [`Proposal`].
    pub supplier_id: supplier::Id,

    /// ID of the activity this [`Proposal`] offers, if any.
    pub activity_id: Option<activity::Id>,

    /// Total price of the whole event.
    pub total_price: Money,

    /// Price of the event for a single person.
    pub price_per_person: Money,

    /// [`Description`] of this [`Proposal`].
    pub description: Description,

    /// [`Extras`] included into this [`Proposal`], if any.
    pub extras: Option<Extras>,

    /// [`Conditions`] of this [`Proposal`], if any.
    pub conditions: Option<Conditions>,

    /// Date the event is proposed to take place on.
    pub proposed_date: Date,

    /// Duration of the event, if known.
    pub duration: Option<Minutes>,

    /// Stored [`Status`] of this [`Proposal`].
    ///
    /// Use [`Proposal::current_status()`] to account the expiration.
    pub status: Status,

    /// [`DateTime`] when this [`Proposal`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Proposal`] was modified last time.
    pub updated_at: ModificationDateTime,

    /// [`DateTime`] since which this [`Proposal`] is expired if it's still
    /// [`Status::Pending`].
    pub expires_at: ExpirationDateTime,
}

impl Proposal {
    /// Default period a [`Proposal`] stays [`Status::Pending`] for.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Returns the [`Status`] of this [`Proposal`] at the provided moment.
    ///
    /// A [`Status::Pending`] [`Proposal`] is [`Status::Expired`] once its
    /// [`Proposal::expires_at`] is reached.
    #[must_use]
    pub fn status_at<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> Status {
        if self.status == Status::Pending && self.expires_at.is_reached_by(now)
        {
            Status::Expired
        } else {
            self.status
        }
    }

    /// Returns the [`Status`] of this [`Proposal`] at the current moment.
    #[must_use]
    pub fn current_status(&self) -> Status {
        self.status_at(DateTimeOf::<()>::now())
    }

    /// Indicates whether this [`Proposal`] is still [`Status::Pending`] at
    /// the provided moment.
    #[must_use]
    pub fn is_pending_at<Of: ?Sized>(&self, now: DateTimeOf<Of>) -> bool {
        self.status_at(now) == Status::Pending
    }

    /// Moves a pending [`Proposal`] into the provided [`Status`].
    ///
    /// # Errors
    ///
    /// With the [`Status`] of this [`Proposal`] at the `at` moment, if it's
    /// not [`Status::Pending`].
    pub fn resolve(
        &mut self,
        to: Status,
        at: ModificationDateTime,
    ) -> Result<(), Status> {
        match self.status_at(at) {
            Status::Pending => {
                self.status = to;
                self.updated_at = at;
                Ok(())
            }
            s @ (Status::Accepted | Status::Rejected | Status::Expired) => {
                Err(s)
            }
        }
    }
}

define_id! {
    #[doc = "ID of a [`Proposal`]."]
    Id
}

define_text! {
    #[doc = "Description of a [`Proposal`]."]
    Description(max = 4096)
}

define_text! {
    #[doc = "Extras included into a [`Proposal`]."]
    Extras(max = 4096)
}

define_text! {
    #[doc = "Conditions of a [`Proposal`]."]
    Conditions(max = 4096)
}

define_kind! {
    #[doc = "Lifecycle status of a [`Proposal`]."]
    enum Status {
        #[doc = "[`Proposal`] awaits a decision of the company."]
        Pending = 1,

        #[doc = "[`Proposal`] has been accepted."]
        Accepted = 2,

        #[doc = "[`Proposal`] has been rejected."]
        Rejected = 3,

        #[doc = "[`Proposal`] hasn't been decided on in time."]
        Expired = 4,
    }
}

/// [`DateTime`] when a [`Proposal`] was created.
pub type CreationDateTime = DateTimeOf<(Proposal, unit::Creation)>;

/// [`DateTime`] when a [`Proposal`] was modified.
pub type ModificationDateTime = DateTimeOf<(Proposal, unit::Modification)>;

/// [`DateTime`] when a [`Proposal`] expires.
pub type ExpirationDateTime = DateTimeOf<(Proposal, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{money::Currency, Date, DateTime, Money};

    use super::{Description, Id, Proposal, Status};
    use crate::domain::{rfq, supplier};

    fn proposal(created_at: DateTime) -> Proposal {
        Proposal {
            id: Id::new(),
            rfq_id: rfq::Id::new(),
            supplier_id: supplier::Id::new(),
            activity_id: None,
            total_price: Money::new(500.into(), Currency::Eur),
            price_per_person: Money::new(25.into(), Currency::Eur),
            description: Description::new("Kayak tour").unwrap(),
            extras: None,
            conditions: None,
            proposed_date: Date::from_ymd(2030, 6, 1).unwrap(),
            duration: None,
            status: Status::Pending,
            created_at: created_at.coerce(),
            updated_at: created_at.coerce(),
            expires_at: (created_at + Proposal::DEFAULT_TTL).coerce(),
        }
    }

    #[test]
    fn expires_once_deadline_is_reached() {
        let created = DateTime::now();
        let p = proposal(created);

        assert_eq!(p.status_at(created), Status::Pending);
        assert_eq!(
            p.status_at(created + Proposal::DEFAULT_TTL - Duration::from_secs(1)),
            Status::Pending,
        );
        assert_eq!(
            p.status_at(created + Proposal::DEFAULT_TTL),
            Status::Expired,
        );
    }

    #[test]
    fn decided_proposals_never_expire() {
        let created = DateTime::now();
        let mut p = proposal(created);
        p.resolve(Status::Accepted, created.coerce()).unwrap();

        assert_eq!(
            p.status_at(created + Proposal::DEFAULT_TTL * 2),
            Status::Accepted,
        );
    }

    #[test]
    fn resolves_only_pending() {
        let created = DateTime::now();
        let mut p = proposal(created);

        p.resolve(Status::Rejected, created.coerce()).unwrap();
        assert_eq!(
            p.resolve(Status::Accepted, created.coerce()),
            Err(Status::Rejected),
        );

        let mut p = proposal(created);
        assert_eq!(
            p.resolve(
                Status::Accepted,
                (created + Proposal::DEFAULT_TTL).coerce(),
            ),
            Err(Status::Expired),
        );
        assert_eq!(p.status, Status::Pending);
    }
}
