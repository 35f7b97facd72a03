//! [`Proposal`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A supplier's offer answering an `Rfq`.
#[derive(Clone, Debug, From)]
pub struct Proposal(domain::Proposal);

/// A supplier's offer answering an `Rfq`.
#[graphql_object(context = Context)]
impl Proposal {
    /// Unique identifier of this `Proposal`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Rfq` this `Proposal` answers.
    pub fn rfq_id(&self) -> api::rfq::Id {
        self.0.rfq_id.into()
    }

    /// ID of the `Supplier` made this `Proposal`.
    pub fn supplier_id(&self) -> api::supplier::Id {
        self.0.supplier_id.into()
    }

    /// Total price of the whole event.
    pub fn total_price(&self) -> Money {
        self.0.total_price
    }

    /// Price per a single participant.
    pub fn price_per_person(&self) -> Money {
        self.0.price_per_person
    }

    /// Description of this `Proposal`.
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// Extras included into this `Proposal`.
    pub fn extras(&self) -> Option<Extras> {
        self.0.extras.clone().map(Into::into)
    }

    /// Conditions of this `Proposal`.
    pub fn conditions(&self) -> Option<Conditions> {
        self.0.conditions.clone().map(Into::into)
    }

    /// Date the event is proposed for.
    pub fn proposed_date(&self) -> Date {
        self.0.proposed_date
    }

    /// Duration of the event, in minutes.
    pub fn duration(&self) -> Option<i32> {
        self.0.duration.map(|m| m.get().into())
    }

    /// Lifecycle status of this `Proposal` at the moment of the request.
    ///
    /// A pending `Proposal` is reported `EXPIRED` once its `expiresAt` is
    /// reached.
    pub fn status(&self) -> Status {
        self.0.current_status().into()
    }

    /// `DateTime` when this `Proposal` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Proposal` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// `DateTime` when this `Proposal` expires, unless decided on.
    pub fn expires_at(&self) -> DateTime {
        self.0.expires_at.coerce()
    }

    /// `Rfq` this `Proposal` answers.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proposal.rfq",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rfq(&self, ctx: &Context) -> Result<Option<api::Rfq>, Error> {
        ctx.service()
            .execute(query::rfq::ById::by(self.0.rfq_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|r| r.map(Into::into))
    }

    /// `Activity` this `Proposal` is based on, if any.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proposal.activity",
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

    /// `Supplier` made this `Proposal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Proposal.supplier",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn supplier(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Supplier>, Error> {
        ctx.service()
            .execute(query::supplier::ById::by(self.0.supplier_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.map(Into::into))
    }
}

/// Result of accepting a `Proposal`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "AcceptProposalResult", context = Context)]
pub struct AcceptResult {
    /// Accepted `Proposal`.
    pub proposal: Proposal,

    /// `Booking` created out of the accepted `Proposal`.
    pub booking: api::Booking,
}

/// Unique identifier of a `Proposal`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::proposal::Id)]
#[into(domain::proposal::Id)]
#[graphql(name = "ProposalId", transparent)]
pub struct Id(Uuid);

/// Description of a `Proposal`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProposalDescription",
    with = scalar::Via::<domain::proposal::Description>,
)]
pub struct Description(domain::proposal::Description);

/// Extras included into a `Proposal`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProposalExtras",
    with = scalar::Via::<domain::proposal::Extras>,
)]
pub struct Extras(domain::proposal::Extras);

/// Conditions of a `Proposal`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProposalConditions",
    with = scalar::Via::<domain::proposal::Conditions>,
)]
pub struct Conditions(domain::proposal::Conditions);

/// Lifecycle status of a `Proposal`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ProposalStatus")]
pub enum Status {
    /// Awaits a decision of the company.
    Pending,

    /// Accepted by the company.
    Accepted,

    /// Rejected by the company.
    Rejected,

    /// Hasn't been decided on in time.
    Expired,
}

impl From<domain::proposal::Status> for Status {
    fn from(status: domain::proposal::Status) -> Self {
        use domain::proposal::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Accepted => Self::Accepted,
            S::Rejected => Self::Rejected,
            S::Expired => Self::Expired,
        }
    }
}
