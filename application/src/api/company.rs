//! [`Company`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A company organizing team-building events.
#[derive(Clone, Debug, From)]
pub struct Company(domain::Company);

/// A company organizing team-building events.
#[graphql_object(context = Context)]
impl Company {
    /// Unique identifier of this `Company`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Company`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Email this `Company` is notified at.
    pub fn email(&self) -> scalar::Email {
        self.0.email.clone().into()
    }

    /// `DateTime` when this `Company` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `Rfq`s issued by this `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Company.rfqs",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn rfqs(&self, ctx: &Context) -> Result<Vec<api::Rfq>, Error> {
        ctx.service()
            .execute(query::rfq::ByCompany::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rfqs| rfqs.into_iter().map(Into::into).collect())
    }

    /// `Booking`s made by this `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Company.bookings",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bookings(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::booking::ByCompany::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Company`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::company::Id)]
#[into(domain::company::Id)]
#[graphql(name = "CompanyId", transparent)]
pub struct Id(Uuid);

/// Name of a `Company`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CompanyName",
    with = scalar::Via::<domain::company::Name>,
)]
pub struct Name(domain::company::Name);
