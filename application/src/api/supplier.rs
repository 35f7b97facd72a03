//! [`Supplier`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A supplier offering team-building activities.
#[derive(Clone, Debug, From)]
pub struct Supplier(domain::Supplier);

/// A supplier offering team-building activities.
#[graphql_object(context = Context)]
impl Supplier {
    /// Unique identifier of this `Supplier`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Supplier`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Email this `Supplier` is notified at.
    pub fn email(&self) -> scalar::Email {
        self.0.email.clone().into()
    }

    /// `DateTime` when this `Supplier` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `Activity`s offered by this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.activities",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn activities(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Activity>, Error> {
        ctx.service()
            .execute(query::activity::BySupplier::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|acts| acts.into_iter().map(Into::into).collect())
    }

    /// `Proposal`s submitted by this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.proposals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proposals(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Proposal>, Error> {
        ctx.service()
            .execute(query::proposal::BySupplier::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// `Booking`s of the events provided by this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.bookings",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn bookings(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Booking>, Error> {
        ctx.service()
            .execute(query::booking::BySupplier::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|bs| bs.into_iter().map(Into::into).collect())
    }

    /// `Review`s given directly to this `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Supplier.reviews",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reviews(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        ctx.service()
            .execute(query::review::BySupplier::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Supplier`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::supplier::Id)]
#[into(domain::supplier::Id)]
#[graphql(name = "SupplierId", transparent)]
pub struct Id(Uuid);

/// Name of a `Supplier`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "SupplierName",
    with = scalar::Via::<domain::supplier::Name>,
)]
pub struct Name(domain::supplier::Name);
