//! [`Booking`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A reservation of an event by a company.
#[derive(Clone, Debug, From)]
pub struct Booking(domain::Booking);

/// A reservation of an event by a company.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Company` made this `Booking`.
    pub fn company_id(&self) -> api::company::Id {
        self.0.company_id.into()
    }

    /// ID of the booked `Activity`, if any.
    pub fn activity_id(&self) -> Option<api::activity::Id> {
        self.0.activity_id.map(Into::into)
    }

    /// ID of the `Proposal` this `Booking` is derived from, if any.
    pub fn proposal_id(&self) -> Option<api::proposal::Id> {
        self.0.proposal_id.map(Into::into)
    }

    /// Date the event takes place on.
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// Number of the event participants.
    pub fn party_size(&self) -> i32 {
        self.0.party_size.get().into()
    }

    /// Total price of the event.
    pub fn total_price(&self) -> Money {
        self.0.total_price
    }

    /// Lifecycle status of this `Booking`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Booking` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Booking` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// Booked `Activity`, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.activity",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn activity(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Activity>, Error> {
        let Some(id) = self.0.activity_id else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::activity::ById::by(id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|a| a.map(Into::into))
    }

    /// `Payment` of this `Booking`, if it has been created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.payment",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn payment(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Payment>, Error> {
        ctx.service()
            .execute(query::payment::ByBooking::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.map(Into::into))
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Lifecycle status of a `Booking`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Awaits a payment.
    Pending,

    /// Paid and confirmed.
    Confirmed,

    /// Cancelled.
    Cancelled,

    /// Rejected by the supplier.
    Rejected,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::Cancelled => Self::Cancelled,
            S::Rejected => Self::Rejected,
        }
    }
}
