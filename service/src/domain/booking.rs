//! [`Booking`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};

use super::{
    activity::{self, Activity, PriceError},
    company, define_id,
    proposal::{self, Proposal},
    PartySize,
};

/// Reservation of an event by a company.
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the company made this [`Booking`].
    pub company_id: company::Id,

    /// ID of the booked [`Activity`], if any.
    pub activity_id: Option<activity::Id>,

    /// ID of the [`Proposal`] this [`Booking`] is derived from, if any.
    pub proposal_id: Option<proposal::Id>,

    /// Date the event takes place on.
    pub date: Date,

    /// Number of people taking part in the event.
    pub party_size: PartySize,

    /// Total price of the event.
    pub total_price: Money,

    /// Lifecycle [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Booking`] was modified last time.
    pub updated_at: ModificationDateTime,
}

impl Booking {
    /// Books the provided [`Activity`] directly.
    ///
    /// # Errors
    ///
    /// If the [`Activity`] cannot be priced for the party.
    pub fn from_activity(
        company_id: company::Id,
        activity: &Activity,
        date: Date,
        party_size: PartySize,
    ) -> Result<Self, PriceError> {
        let total_price = activity.price_for(party_size)?;
        Ok(Self::new(
            company_id,
            Some(activity.id),
            None,
            date,
            party_size,
            total_price,
        ))
    }

    /// Books the event offered by the provided [`Proposal`].
    ///
    /// The price is re-derived from the [`Activity`] the [`Proposal`] refers
    /// to, otherwise [`Proposal::total_price`] is used.
    ///
    /// # Errors
    ///
    /// If the referred [`Activity`] cannot be priced for the party.
    pub fn from_proposal(
        company_id: company::Id,
        proposal: &Proposal,
        activity: Option<&Activity>,
        party_size: PartySize,
    ) -> Result<Self, PriceError> {
        let (activity_id, total_price) = match activity {
            Some(a) => (Some(a.id), a.price_for(party_size)?),
            None => (None, proposal.total_price),
        };
        Ok(Self::new(
            company_id,
            activity_id,
            Some(proposal.id),
            proposal.proposed_date,
            party_size,
            total_price,
        ))
    }

    /// Creates a new [`Status::Pending`] [`Booking`].
    fn new(
        company_id: company::Id,
        activity_id: Option<activity::Id>,
        proposal_id: Option<proposal::Id>,
        date: Date,
        party_size: PartySize,
        total_price: Money,
    ) -> Self {
        let now = DateTimeOf::<()>::now();
        Self {
            id: Id::new(),
            company_id,
            activity_id,
            proposal_id,
            date,
            party_size,
            total_price,
            status: Status::Pending,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Confirms this [`Booking`] once it's paid.
    ///
    /// Returns whether this [`Booking`] has been changed.
    pub fn confirm(&mut self, at: ModificationDateTime) -> bool {
        if self.status == Status::Confirmed {
            return false;
        }
        self.status = Status::Confirmed;
        self.updated_at = at;
        true
    }

    /// Accepts this [`Booking`] on behalf of the supplier providing the
    /// event.
    ///
    /// Returns whether this [`Booking`] has been changed.
    ///
    /// # Errors
    ///
    /// With the current [`Status`], if this [`Booking`] is cancelled or
    /// rejected already.
    pub fn accept(&mut self, at: ModificationDateTime) -> Result<bool, Status> {
        match self.status {
            Status::Pending | Status::Confirmed => Ok(self.confirm(at)),
            s @ (Status::Cancelled | Status::Rejected) => Err(s),
        }
    }

    /// Rejects this [`Booking`] on behalf of the supplier providing the
    /// event.
    ///
    /// # Errors
    ///
    /// With the current [`Status`], unless this [`Booking`] is
    /// [`Status::Pending`].
    pub fn reject(&mut self, at: ModificationDateTime) -> Result<(), Status> {
        if self.status != Status::Pending {
            return Err(self.status);
        }
        self.status = Status::Rejected;
        self.updated_at = at;
        Ok(())
    }

    /// Cancels this [`Booking`] regardless of its current [`Status`].
    pub fn cancel(&mut self, at: ModificationDateTime) {
        self.status = Status::Cancelled;
        self.updated_at = at;
    }
}

define_id! {
    #[doc = "ID of a [`Booking`]."]
    Id
}

define_kind! {
    #[doc = "Lifecycle status of a [`Booking`]."]
    enum Status {
        #[doc = "[`Booking`] awaits a payment."]
        Pending = 1,

        #[doc = "[`Booking`] is paid and confirmed."]
        Confirmed = 2,

        #[doc = "[`Booking`] has been cancelled."]
        Cancelled = 3,

        #[doc = "[`Booking`] has been rejected by the supplier."]
        Rejected = 4,
    }
}

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

/// [`DateTime`] when a [`Booking`] was modified.
pub type ModificationDateTime = DateTimeOf<(Booking, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, DateTime, Money, Rating};

    use super::{Booking, Status};
    use crate::domain::{
        activity::{self, Activity},
        company,
        proposal::{self, Proposal},
        rfq, supplier, Capacity, PartySize,
    };

    fn eur(amount: &str) -> Money {
        Money::new(amount.parse().unwrap(), Currency::Eur)
    }

    fn activity() -> Activity {
        Activity {
            id: activity::Id::new(),
            supplier_id: supplier::Id::new(),
            name: activity::Name::new("Canoeing").unwrap(),
            price_per_person: eur("25"),
            capacity: Capacity::new(20).unwrap(),
            status: activity::Status::Approved,
            rating: Rating::default(),
            reviews_count: 0,
            created_at: DateTime::now().coerce(),
        }
    }

    fn proposal(activity_id: Option<activity::Id>) -> Proposal {
        let now = DateTime::now();
        Proposal {
            id: proposal::Id::new(),
            rfq_id: rfq::Id::new(),
            supplier_id: supplier::Id::new(),
            activity_id,
            total_price: eur("777.70"),
            price_per_person: eur("77.77"),
            description: proposal::Description::new("Offer").unwrap(),
            extras: None,
            conditions: None,
            proposed_date: Date::from_ymd(2030, 6, 1).unwrap(),
            duration: None,
            status: proposal::Status::Accepted,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            expires_at: (now + Proposal::DEFAULT_TTL).coerce(),
        }
    }

    #[test]
    fn direct_booking_derives_price() {
        let a = activity();
        let b = Booking::from_activity(
            company::Id::new(),
            &a,
            Date::from_ymd(2030, 6, 1).unwrap(),
            PartySize::new(20).unwrap(),
        )
        .unwrap();

        assert_eq!(b.total_price, eur("500"));
        assert_eq!(b.status, Status::Pending);
        assert_eq!(b.activity_id, Some(a.id));
        assert_eq!(b.proposal_id, None);

        assert!(Booking::from_activity(
            company::Id::new(),
            &a,
            Date::from_ymd(2030, 6, 1).unwrap(),
            PartySize::new(21).unwrap(),
        )
        .is_err());
    }

    #[test]
    fn proposal_booking_prefers_activity_price() {
        let a = activity();
        let p = proposal(Some(a.id));

        let b = Booking::from_proposal(
            company::Id::new(),
            &p,
            Some(&a),
            PartySize::new(10).unwrap(),
        )
        .unwrap();
        assert_eq!(b.total_price, eur("250"));
        assert_eq!(b.proposal_id, Some(p.id));
        assert_eq!(b.date, p.proposed_date);
    }

    #[test]
    fn proposal_booking_falls_back_to_proposal_price() {
        let p = proposal(None);

        let b = Booking::from_proposal(
            company::Id::new(),
            &p,
            None,
            PartySize::new(500).unwrap(),
        )
        .unwrap();
        assert_eq!(b.total_price, eur("777.70"));
        assert_eq!(b.activity_id, None);
    }

    #[test]
    fn confirms_once() {
        let mut b = Booking::from_activity(
            company::Id::new(),
            &activity(),
            Date::from_ymd(2030, 6, 1).unwrap(),
            PartySize::new(2).unwrap(),
        )
        .unwrap();

        assert!(b.confirm(DateTime::now().coerce()));
        assert!(!b.confirm(DateTime::now().coerce()));
        assert_eq!(b.status, Status::Confirmed);

        b.cancel(DateTime::now().coerce());
        assert_eq!(b.status, Status::Cancelled);
    }

    #[test]
    fn supplier_decides_only_open_bookings() {
        let new = || {
            Booking::from_activity(
                company::Id::new(),
                &activity(),
                Date::from_ymd(2030, 6, 1).unwrap(),
                PartySize::new(2).unwrap(),
            )
            .unwrap()
        };
        let now = || DateTime::now().coerce();

        let mut accepted = new();
        assert_eq!(accepted.accept(now()), Ok(true));
        assert_eq!(accepted.accept(now()), Ok(false));
        assert_eq!(accepted.status, Status::Confirmed);
        assert_eq!(accepted.reject(now()), Err(Status::Confirmed));

        let mut rejected = new();
        assert_eq!(rejected.reject(now()), Ok(()));
        assert_eq!(rejected.status, Status::Rejected);
        assert_eq!(rejected.accept(now()), Err(Status::Rejected));
        assert_eq!(rejected.reject(now()), Err(Status::Rejected));

        let mut cancelled = new();
        cancelled.cancel(now());
        assert_eq!(cancelled.accept(now()), Err(Status::Cancelled));
        assert_eq!(cancelled.reject(now()), Err(Status::Cancelled));
    }

    #[test]
    fn status_is_named_in_screaming_snake_case() {
        assert_eq!(Status::Confirmed.to_string(), "CONFIRMED");
        assert_eq!("REJECTED".parse::<Status>(), Ok(Status::Rejected));
        assert!("rejected".parse::<Status>().is_err());
    }
}
