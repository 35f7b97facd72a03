//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Company` performing the request.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `COMPANY_NOT_EXISTS` - the identified `Company` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myCompany",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_company(ctx: &Context) -> Result<api::Company, Error> {
        let my_id = ctx.current_company().await?;
        Self::company(my_id.into(), ctx).await
    }

    /// Returns the `Supplier` performing the request.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `SUPPLIER_NOT_EXISTS` - the identified `Supplier` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "mySupplier",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_supplier(ctx: &Context) -> Result<api::Supplier, Error> {
        let my_id = ctx.current_supplier().await?;
        Self::supplier(my_id.into(), ctx).await
    }

    /// Returns the `Company` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `COMPANY_NOT_EXISTS` - the `Company` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "company",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn company(
        id: api::company::Id,
        ctx: &Context,
    ) -> Result<api::Company, Error> {
        ctx.service()
            .execute(query::company::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CompanyError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Supplier` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SUPPLIER_NOT_EXISTS` - the `Supplier` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "supplier",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn supplier(
        id: api::supplier::Id,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(query::supplier::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| SupplierError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Activity` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ACTIVITY_NOT_EXISTS` - the `Activity` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "activity",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn activity(
        id: api::activity::Id,
        ctx: &Context,
    ) -> Result<api::Activity, Error> {
        ctx.service()
            .execute(query::activity::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ActivityError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Rfq` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RFQ_NOT_EXISTS` - the `Rfq` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "rfq",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rfq(id: api::rfq::Id, ctx: &Context) -> Result<api::Rfq, Error> {
        ctx.service()
            .execute(query::rfq::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| RfqError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Fetches the page of `Rfq`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AMBIGUOUS_PAGINATION_ARGUMENTS` - the pagination arguments are
    ///                                      ambiguous.
    #[tracing::instrument(
        skip_all,
        fields(
            after = ?after,
            before = ?before,
            company_id = ?company_id,
            first = ?first,
            gql.name = "rfqs",
            last = ?last,
            location = ?location.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn rfqs(
        first: Option<i32>,
        after: Option<api::rfq::list::Cursor>,
        last: Option<i32>,
        before: Option<api::rfq::list::Cursor>,
        status: Option<api::rfq::Status>,
        location: Option<api::rfq::Location>,
        company_id: Option<api::company::Id>,
        ctx: &Context,
    ) -> Result<api::rfq::list::Connection, Error> {
        const DEFAULT_PAGE_SIZE: i32 = 10;

        let arguments = read::rfq::list::Arguments::new(
            first,
            after.map(Into::into),
            last,
            before.map(Into::into),
            DEFAULT_PAGE_SIZE,
        )
        .ok_or_else(|| api::PaginationError::Ambiguous.into())
        .map_err(ctx.error())?;
        let filter = read::rfq::list::Filter {
            status: status.map(Into::into),
            company_id: company_id.map(Into::into),
            location: location.map(Into::into),
        };

        ctx.service()
            .execute(query::rfq::List::by(read::rfq::list::Selector {
                arguments,
                filter: filter.clone(),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|page| api::rfq::list::Connection::new(page, filter))
    }

    /// Returns the `Proposal` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROPOSAL_NOT_EXISTS` - the `Proposal` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "proposal",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn proposal(
        id: api::proposal::Id,
        ctx: &Context,
    ) -> Result<api::Proposal, Error> {
        ctx.service()
            .execute(query::proposal::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProposalError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "booking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Booking` derived from the specified `Proposal`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookingByProposal",
            otel.name = Self::SPAN_NAME,
            proposal_id = %proposal_id,
        ),
    )]
    pub async fn booking_by_proposal(
        proposal_id: api::proposal::Id,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        ctx.service()
            .execute(query::booking::ByProposal::by(proposal_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.map(Into::into))
    }

    /// Returns the `Payment` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PAYMENT_NOT_EXISTS` - the `Payment` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "payment",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn payment(
        id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(query::payment::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PaymentError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum ActivityError {
        #[code = "ACTIVITY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Activity` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CompanyError {
        #[code = "COMPANY_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Company` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PaymentError {
        #[code = "PAYMENT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Payment` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ProposalError {
        #[code = "PROPOSAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Proposal` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RfqError {
        #[code = "RFQ_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rfq` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum SupplierError {
        #[code = "SUPPLIER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Supplier` with the specified ID does not exist"]
        NotExists,
    }
}
