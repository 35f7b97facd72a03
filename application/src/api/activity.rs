//! [`Activity`]-related definitions.

use common::{DateTime, Money, Rating};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A bookable team-building activity.
#[derive(Clone, Debug, From)]
pub struct Activity(domain::Activity);

/// A bookable team-building activity.
#[graphql_object(context = Context)]
impl Activity {
    /// Unique identifier of this `Activity`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `Activity`.
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Price of this `Activity` per a single participant.
    pub fn price_per_person(&self) -> Money {
        self.0.price_per_person
    }

    /// Maximal number of participants of this `Activity`.
    pub fn capacity(&self) -> i32 {
        self.0.capacity.get().into()
    }

    /// Moderation status of this `Activity`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Average rating of this `Activity`, `0` if not rated yet.
    pub fn rating(&self) -> Rating {
        self.0.rating
    }

    /// Number of `Review`s this `Activity` is rated by.
    pub fn reviews_count(&self) -> i32 {
        i32::try_from(self.0.reviews_count).unwrap_or(i32::MAX)
    }

    /// `DateTime` when this `Activity` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `Supplier` offering this `Activity`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Activity.supplier",
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

    /// `Review`s of this `Activity`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Activity.reviews",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn reviews(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Review>, Error> {
        ctx.service()
            .execute(query::review::ByActivity::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of an `Activity`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::activity::Id)]
#[into(domain::activity::Id)]
#[graphql(name = "ActivityId", transparent)]
pub struct Id(Uuid);

/// Name of an `Activity`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ActivityName",
    with = scalar::Via::<domain::activity::Name>,
)]
pub struct Name(domain::activity::Name);

/// Moderation status of an `Activity`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ActivityStatus")]
pub enum Status {
    /// Awaits a moderation.
    Pending,

    /// Approved to be listed.
    Approved,

    /// Rejected by a moderation.
    Rejected,
}

impl From<domain::activity::Status> for Status {
    fn from(status: domain::activity::Status) -> Self {
        use domain::activity::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
        }
    }
}
