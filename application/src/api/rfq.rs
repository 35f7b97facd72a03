//! [`Rfq`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A request for quotation of a team-building event.
#[derive(Clone, Debug, From)]
pub struct Rfq(domain::Rfq);

/// A request for quotation of a team-building event.
#[graphql_object(context = Context)]
impl Rfq {
    /// Unique identifier of this `Rfq`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Company` issued this `Rfq`.
    pub fn company_id(&self) -> api::company::Id {
        self.0.company_id.into()
    }

    /// Number of the event participants.
    pub fn party_size(&self) -> i32 {
        self.0.party_size.get().into()
    }

    /// Preferred date of the event.
    pub fn preferred_date(&self) -> Date {
        self.0.preferred_date
    }

    /// Alternative date of the event.
    pub fn alternate_date(&self) -> Option<Date> {
        self.0.alternate_date
    }

    /// Location the event should take place around.
    pub fn location(&self) -> Location {
        self.0.location.clone().into()
    }

    /// Search radius around the `location`, in kilometers.
    pub fn radius_km(&self) -> i32 {
        self.0.radius_km.get().into()
    }

    /// Maximal budget of the whole event.
    pub fn max_budget(&self) -> Money {
        self.0.max_budget
    }

    /// Objective of the event.
    pub fn objective(&self) -> Objective {
        self.0.objective.clone().into()
    }

    /// Free-form preferences.
    pub fn preferences(&self) -> Option<Preferences> {
        self.0.preferences.clone().map(Into::into)
    }

    /// Category of activities of interest.
    pub fn category(&self) -> Option<Category> {
        self.0.category.clone().map(Into::into)
    }

    /// Climate the event should take place in.
    pub fn climate(&self) -> Option<Climate> {
        self.0.climate.map(Into::into)
    }

    /// Maximal duration of the event, in minutes.
    pub fn max_duration(&self) -> Option<i32> {
        self.0.max_duration.map(|m| m.get().into())
    }

    /// Lifecycle status of this `Rfq`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Rfq` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Rfq` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// `Proposal`s answering this `Rfq`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Rfq.proposals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn proposals(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Proposal>, Error> {
        ctx.service()
            .execute(query::proposal::ByRfq::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of an `Rfq`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::rfq::Id)]
#[into(domain::rfq::Id)]
#[graphql(name = "RfqId", transparent)]
pub struct Id(Uuid);

/// Location an `Rfq` event should take place around.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RfqLocation",
    with = scalar::Via::<domain::rfq::Location>,
)]
pub struct Location(domain::rfq::Location);

/// Objective of an `Rfq` event.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RfqObjective",
    with = scalar::Via::<domain::rfq::Objective>,
)]
pub struct Objective(domain::rfq::Objective);

/// Free-form preferences of an `Rfq`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RfqPreferences",
    with = scalar::Via::<domain::rfq::Preferences>,
)]
pub struct Preferences(domain::rfq::Preferences);

/// Category of activities an `Rfq` is interested in.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "RfqCategory",
    with = scalar::Via::<domain::rfq::Category>,
)]
pub struct Category(domain::rfq::Category);

/// Lifecycle status of an `Rfq`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RfqStatus")]
pub enum Status {
    /// Awaits proposals.
    Open,

    /// Has received at least one proposal.
    Negotiating,

    /// One of the proposals has been accepted.
    Closed,

    /// Cancelled by its company.
    Cancelled,
}

impl From<domain::rfq::Status> for Status {
    fn from(status: domain::rfq::Status) -> Self {
        use domain::rfq::Status as S;
        match status {
            S::Open => Self::Open,
            S::Negotiating => Self::Negotiating,
            S::Closed => Self::Closed,
            S::Cancelled => Self::Cancelled,
        }
    }
}

impl From<Status> for domain::rfq::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Open => Self::Open,
            Status::Negotiating => Self::Negotiating,
            Status::Closed => Self::Closed,
            Status::Cancelled => Self::Cancelled,
        }
    }
}

/// Climate an `Rfq` event should take place in.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "RfqClimate")]
pub enum Climate {
    /// Under a roof.
    Indoor,

    /// In the open air.
    Outdoor,

    /// Either way.
    Any,
}

impl From<domain::rfq::Climate> for Climate {
    fn from(climate: domain::rfq::Climate) -> Self {
        use domain::rfq::Climate as C;
        match climate {
            C::Indoor => Self::Indoor,
            C::Outdoor => Self::Outdoor,
            C::Any => Self::Any,
        }
    }
}

impl From<Climate> for domain::rfq::Climate {
    fn from(climate: Climate) -> Self {
        match climate {
            Climate::Indoor => Self::Indoor,
            Climate::Outdoor => Self::Outdoor,
            Climate::Any => Self::Any,
        }
    }
}

pub mod list {
    //! Definitions related to the [`Rfq`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Rfq};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Rfq` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::rfq::list::Cursor)]
    #[graphql(
        name = "RfqListCursor",
        with = scalar::Via::<read::rfq::list::Cursor>,
    )]
    pub struct Cursor(pub read::rfq::list::Cursor);

    /// Edge in the [`Rfq`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Edge(read::rfq::list::Edge);

    /// Edge in the `Rfq` list.
    #[graphql_object(name = "RfqListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `RfqListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `RfqListEdge`.
        #[must_use]
        pub fn node(&self) -> Rfq {
            self.0.node.clone().into()
        }
    }

    /// Connection of the [`Rfq`] list.
    #[derive(Clone, Debug)]
    pub struct Connection {
        /// Underlying [`read::rfq::list::Connection`].
        page: read::rfq::list::Connection,

        /// [`read::rfq::list::Filter`] the page is selected with.
        filter: read::rfq::list::Filter,
    }

    impl Connection {
        /// Creates a new [`Connection`] out of the provided page selected
        /// with the `filter`.
        #[must_use]
        pub fn new(
            page: read::rfq::list::Connection,
            filter: read::rfq::list::Filter,
        ) -> Self {
            Self { page, filter }
        }
    }

    /// Connection of the `Rfq` list.
    #[graphql_object(name = "RfqListConnection", context = Context)]
    impl Connection {
        /// Edges of this `RfqListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.page.edges.iter().cloned().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.page.page_info(),
                filter: self.filter.clone(),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::rfq::list::PageInfo`].
        info: read::rfq::list::PageInfo,

        /// [`read::rfq::list::Filter`] the page is selected with.
        filter: read::rfq::list::Filter,
    }

    /// Information about a `RfqListConnection` page.
    #[graphql_object(name = "RfqListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> Option<Cursor> {
            self.info.start_cursor.map(Into::into)
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> Option<Cursor> {
            self.info.end_cursor.map(Into::into)
        }

        /// Total count of `Rfq`s passing the same filter.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::rfq::TotalCount::by(self.filter.clone()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
