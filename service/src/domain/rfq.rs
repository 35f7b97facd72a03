//! [`Rfq`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};

use super::{
    company, define_id, define_text, Minutes, PartySize, RadiusKm,
};

/// Request for quotation of a team-building event issued by a company.
#[derive(Clone, Debug)]
pub struct Rfq {
    /// ID of this [`Rfq`].
    pub id: Id,

    /// ID of the company issued this [`Rfq`].
    pub company_id: company::Id,

    /// Number of people the event is requested for.
    pub party_size: PartySize,

    /// Date the event is preferred to take place on.
    pub preferred_date: Date,

    /// Alternative date the event may take place on, if any.
    pub alternate_date: Option<Date>,

    /// [`Location`] the event should take place around.
    pub location: Location,

    /// Radius around the [`Rfq::location`] the event may take place within.
    pub radius_km: RadiusKm,

    /// Maximal budget for the whole event.
    pub max_budget: Money,

    /// [`Objective`] of the event.
    pub objective: Objective,

    /// Free-form [`Preferences`] of the company, if any.
    pub preferences: Option<Preferences>,

    /// [`Category`] of activities the company is interested in, if any.
    pub category: Option<Category>,

    /// [`Climate`] the event should take place in, if any preference.
    pub climate: Option<Climate>,

    /// Maximal duration of the event, if limited.
    pub max_duration: Option<Minutes>,

    /// Lifecycle [`Status`] of this [`Rfq`].
    pub status: Status,

    /// [`DateTime`] when this [`Rfq`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rfq`] was modified last time.
    pub updated_at: ModificationDateTime,
}

impl Rfq {
    /// Indicates whether new proposals may be submitted to (or accepted for)
    /// this [`Rfq`].
    #[must_use]
    pub const fn accepts_proposals(&self) -> bool {
        matches!(self.status, Status::Open | Status::Negotiating)
    }

    /// Marks the receipt of a proposal.
    ///
    /// Moves an [`Status::Open`] [`Rfq`] into [`Status::Negotiating`] and
    /// returns whether it has been changed.
    pub fn receive_proposal(&mut self, at: ModificationDateTime) -> bool {
        if self.status != Status::Open {
            return false;
        }
        self.status = Status::Negotiating;
        self.updated_at = at;
        true
    }

    /// Closes this [`Rfq`] once one of its proposals is accepted.
    ///
    /// # Errors
    ///
    /// With the current [`Status`] if proposals are not accepted anymore.
    pub fn close(&mut self, at: ModificationDateTime) -> Result<(), Status> {
        self.transit(Status::Closed, at)
    }

    /// Cancels this [`Rfq`].
    ///
    /// # Errors
    ///
    /// With the current [`Status`] if this [`Rfq`] is closed or cancelled
    /// already.
    pub fn cancel(&mut self, at: ModificationDateTime) -> Result<(), Status> {
        self.transit(Status::Cancelled, at)
    }

    /// Moves this [`Rfq`] into the provided terminal [`Status`].
    fn transit(
        &mut self,
        to: Status,
        at: ModificationDateTime,
    ) -> Result<(), Status> {
        if !self.accepts_proposals() {
            return Err(self.status);
        }
        self.status = to;
        self.updated_at = at;
        Ok(())
    }
}

define_id! {
    #[doc = "ID of an [`Rfq`]."]
    Id
}

define_text! {
    #[doc = "Location an [`Rfq`] event should take place around."]
    Location(max = 256)
}

define_text! {
    #[doc = "Objective of an [`Rfq`] event."]
    Objective(max = 4096)
}

define_text! {
    #[doc = "Free-form preferences of an [`Rfq`]."]
    Preferences(max = 4096)
}

define_text! {
    #[doc = "Category of activities an [`Rfq`] is interested in."]
    Category(max = 64)
}

define_kind! {
    #[doc = "Lifecycle status of an [`Rfq`]."]
    enum Status {
        #[doc = "[`Rfq`] awaits proposals."]
        Open = 1,

        #[doc = "[`Rfq`] has received at least one proposal."]
        Negotiating = 2,

        #[doc = "One of [`Rfq`] proposals has been accepted."]
        Closed = 3,

        #[doc = "[`Rfq`] has been cancelled by its company."]
        Cancelled = 4,
    }
}

define_kind! {
    #[doc = "Climate an [`Rfq`] event should take place in."]
    enum Climate {
        #[doc = "Under a roof."]
        Indoor = 1,

        #[doc = "In the open air."]
        Outdoor = 2,

        #[doc = "Either way."]
        Any = 3,
    }
}

define_kind! {
    #[doc = "What happens to pending proposals of a cancelled [`Rfq`]."]
    enum CancellationPolicy {
        #[doc = "Pending proposals are left untouched."]
        KeepProposals = 1,

        #[doc = "Pending proposals are rejected along with the cancellation."]
        RejectPendingProposals = 2,
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::KeepProposals
    }
}

/// [`DateTime`] when an [`Rfq`] was created.
pub type CreationDateTime = DateTimeOf<(Rfq, unit::Creation)>;

/// [`DateTime`] when an [`Rfq`] was modified.
pub type ModificationDateTime = DateTimeOf<(Rfq, unit::Modification)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, DateTime, Money};

    use super::{Id, Location, Objective, Rfq, Status};
    use crate::domain::{company, PartySize, RadiusKm};

    fn rfq(status: Status) -> Rfq {
        Rfq {
            id: Id::new(),
            company_id: company::Id::new(),
            party_size: PartySize::new(10).unwrap(),
            preferred_date: Date::from_ymd(2030, 6, 1).unwrap(),
            alternate_date: None,
            location: Location::new("Lisbon").unwrap(),
            radius_km: RadiusKm::default(),
            max_budget: Money::new(1000.into(), Currency::Eur),
            objective: Objective::new("Team bonding").unwrap(),
            preferences: None,
            category: None,
            climate: None,
            max_duration: None,
            status,
            created_at: DateTime::now().coerce(),
            updated_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn first_proposal_starts_negotiation() {
        let mut r = rfq(Status::Open);

        assert!(r.receive_proposal(DateTime::now().coerce()));
        assert_eq!(r.status, Status::Negotiating);

        assert!(!r.receive_proposal(DateTime::now().coerce()));
        assert_eq!(r.status, Status::Negotiating);
    }

    #[test]
    fn accepts_proposals_only_while_open_or_negotiating() {
        assert!(rfq(Status::Open).accepts_proposals());
        assert!(rfq(Status::Negotiating).accepts_proposals());
        assert!(!rfq(Status::Closed).accepts_proposals());
        assert!(!rfq(Status::Cancelled).accepts_proposals());
    }

    #[test]
    fn terminal_states_are_final() {
        let mut r = rfq(Status::Negotiating);
        r.close(DateTime::now().coerce()).unwrap();
        assert_eq!(r.status, Status::Closed);

        assert_eq!(r.cancel(DateTime::now().coerce()), Err(Status::Closed));
        assert_eq!(r.close(DateTime::now().coerce()), Err(Status::Closed));

        let mut r = rfq(Status::Open);
        r.cancel(DateTime::now().coerce()).unwrap();
        assert_eq!(r.close(DateTime::now().coerce()), Err(Status::Cancelled));
    }
}
