//! GraphQL [`Mutation`]s definitions.

use std::fmt;

use common::{Date, Money};
use juniper::graphql_object;
use service::{command, domain::activity, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createCompany",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_company(
        name: api::company::Name,
        email: api::scalar::Email,
        ctx: &Context,
    ) -> Result<api::Company, Error> {
        ctx.service()
            .execute(command::CreateCompany {
                name: name.into(),
                email: email.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Supplier`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "createSupplier",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_supplier(
        name: api::supplier::Name,
        email: api::scalar::Email,
        ctx: &Context,
    ) -> Result<api::Supplier, Error> {
        ctx.service()
            .execute(command::CreateSupplier {
                name: name.into(),
                email: email.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Activity` of the calling `Supplier`, awaiting a
    /// moderation.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `INVALID_INPUT` - the price is not positive or the capacity is out
    ///                     of bounds;
    /// - `NOT_FOUND` - the calling `Supplier` does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            capacity = capacity,
            gql.name = "createActivity",
            name = %name,
            otel.name = Self::SPAN_NAME,
            price_per_person = %price_per_person,
        ),
    )]
    pub async fn create_activity(
        name: api::activity::Name,
        price_per_person: Money,
        capacity: i32,
        ctx: &Context,
    ) -> Result<api::Activity, Error> {
        let my_id = ctx.current_supplier().await?;
        let capacity = api::quantity(capacity).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateActivity {
                supplier_id: my_id,
                name: name.into(),
                price_per_person,
                capacity,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Approves or rejects the pending `Activity`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Activity` does not exist;
    /// - `INVALID_STATE` - the `Activity` has been moderated already.
    #[tracing::instrument(
        skip_all,
        fields(
            activity_id = %activity_id,
            approve = approve,
            gql.name = "reviewActivity",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn review_activity(
        activity_id: api::activity::Id,
        approve: bool,
        ctx: &Context,
    ) -> Result<api::Activity, Error> {
        ctx.service()
            .execute(command::ReviewActivity {
                activity_id: activity_id.into(),
                approve,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Issues a new `Rfq` of the calling `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `INVALID_INPUT` - the budget is not positive or any of the numbers
    ///                     is out of bounds;
    /// - `NOT_FOUND` - the calling `Company` does not exist.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createRfq",
            location = %location,
            max_budget = %max_budget,
            otel.name = Self::SPAN_NAME,
            party_size = party_size,
            preferred_date = %preferred_date,
        ),
    )]
    pub async fn create_rfq(
        party_size: i32,
        preferred_date: Date,
        alternate_date: Option<Date>,
        location: api::rfq::Location,
        radius_km: Option<i32>,
        max_budget: Money,
        objective: api::rfq::Objective,
        preferences: Option<api::rfq::Preferences>,
        category: Option<api::rfq::Category>,
        climate: Option<api::rfq::Climate>,
        max_duration: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Rfq, Error> {
        let my_id = ctx.current_company().await?;
        let party_size = api::quantity(party_size).map_err(ctx.error())?;
        let radius_km = radius_km
            .map(api::quantity)
            .transpose()
            .map_err(ctx.error())?;
        let max_duration = max_duration
            .map(api::quantity)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateRfq {
                company_id: my_id,
                party_size,
                preferred_date,
                alternate_date,
                location: location.into(),
                radius_km,
                max_budget,
                objective: objective.into(),
                preferences: preferences.map(Into::into),
                category: category.map(Into::into),
                climate: climate.map(Into::into),
                max_duration,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Rfq` of the calling `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Rfq` does not exist;
    /// - `UNAUTHORIZED` - the `Rfq` is issued by another `Company`;
    /// - `RFQ_NOT_OPEN` - the `Rfq` is closed or cancelled already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelRfq",
            otel.name = Self::SPAN_NAME,
            rfq_id = %rfq_id,
        ),
    )]
    pub async fn cancel_rfq(
        rfq_id: api::rfq::Id,
        ctx: &Context,
    ) -> Result<api::Rfq, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::CancelRfq {
                rfq_id: rfq_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Submits a new `Proposal` of the calling `Supplier` answering the
    /// `Rfq`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `NOT_FOUND` - the `Rfq`, the `Activity` or the calling `Supplier`
    ///                 does not exist;
    /// - `RFQ_NOT_OPEN` - the `Rfq` doesn't accept proposals anymore;
    /// - `UNAUTHORIZED` - the `Activity` is offered by another `Supplier`;
    /// - `INVALID_INPUT` - the prices are not positive.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            activity_id = ?activity_id,
            gql.name = "submitProposal",
            otel.name = Self::SPAN_NAME,
            proposed_date = %proposed_date,
            rfq_id = %rfq_id,
            total_price = %total_price,
        ),
    )]
    pub async fn submit_proposal(
        rfq_id: api::rfq::Id,
        activity_id: Option<api::activity::Id>,
        total_price: Money,
        price_per_person: Money,
        description: api::proposal::Description,
        extras: Option<api::proposal::Extras>,
        conditions: Option<api::proposal::Conditions>,
        proposed_date: Date,
        duration: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Proposal, Error> {
        let my_id = ctx.current_supplier().await?;
        let duration =
            duration.map(api::quantity).transpose().map_err(ctx.error())?;

        ctx.service()
            .execute(command::SubmitProposal {
                rfq_id: rfq_id.into(),
                supplier_id: my_id,
                activity_id: activity_id.map(Into::into),
                total_price,
                price_per_person,
                description: description.into(),
                extras: extras.map(Into::into),
                conditions: conditions.map(Into::into),
                proposed_date,
                duration,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the terms of the pending `Proposal` of the calling
    /// `Supplier`.
    ///
    /// Omitted arguments leave the corresponding terms unchanged.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `NOT_FOUND` - the `Proposal` does not exist;
    /// - `UNAUTHORIZED` - the `Proposal` is made by another `Supplier`;
    /// - `INVALID_STATE` - the `Proposal` is not pending anymore;
    /// - `INVALID_INPUT` - the prices are not positive.
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProposal",
            otel.name = Self::SPAN_NAME,
            proposal_id = %proposal_id,
        ),
    )]
    pub async fn update_proposal(
        proposal_id: api::proposal::Id,
        total_price: Option<Money>,
        price_per_person: Option<Money>,
        description: Option<api::proposal::Description>,
        extras: Option<api::proposal::Extras>,
        conditions: Option<api::proposal::Conditions>,
        proposed_date: Option<Date>,
        duration: Option<i32>,
        ctx: &Context,
    ) -> Result<api::Proposal, Error> {
        let my_id = ctx.current_supplier().await?;
        let duration =
            duration.map(api::quantity).transpose().map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateProposal {
                proposal_id: proposal_id.into(),
                supplier_id: my_id,
                total_price,
                price_per_person,
                description: description.map(Into::into),
                extras: extras.map(Into::into),
                conditions: conditions.map(Into::into),
                proposed_date,
                duration,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Accepts the pending `Proposal` answering the `Rfq` of the calling
    /// `Company`, closing the `Rfq` and booking the proposed event.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Proposal`, its `Rfq` or `Activity` does not
    ///                 exist;
    /// - `UNAUTHORIZED` - the `Rfq` is issued by another `Company`;
    /// - `INVALID_STATE` - the `Proposal` is not pending anymore;
    /// - `RFQ_NOT_OPEN` - another `Proposal` has been accepted already;
    /// - `CAPACITY_EXCEEDED` - the party doesn't fit into the `Activity`;
    /// - `INVALID_INPUT` - the total price is too large.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "acceptProposal",
            otel.name = Self::SPAN_NAME,
            proposal_id = %proposal_id,
        ),
    )]
    pub async fn accept_proposal(
        proposal_id: api::proposal::Id,
        ctx: &Context,
    ) -> Result<api::proposal::AcceptResult, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::AcceptProposal {
                proposal_id: proposal_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| api::proposal::AcceptResult {
                proposal: out.proposal.into(),
                booking: out.booking.into(),
            })
    }

    /// Rejects the pending `Proposal` answering the `Rfq` of the calling
    /// `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Proposal` does not exist;
    /// - `UNAUTHORIZED` - the `Rfq` is issued by another `Company`;
    /// - `INVALID_STATE` - the `Proposal` is not pending anymore.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "rejectProposal",
            otel.name = Self::SPAN_NAME,
            proposal_id = %proposal_id,
        ),
    )]
    pub async fn reject_proposal(
        proposal_id: api::proposal::Id,
        ctx: &Context,
    ) -> Result<api::Proposal, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::RejectProposal {
                proposal_id: proposal_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Books the `Activity` directly for the calling `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Activity` or the calling `Company` does not
    ///                 exist;
    /// - `CAPACITY_EXCEEDED` - the party doesn't fit into the `Activity`;
    /// - `INVALID_INPUT` - the party size is out of bounds or the total
    ///                     price is too large.
    #[tracing::instrument(
        skip_all,
        fields(
            activity_id = %activity_id,
            date = %date,
            gql.name = "bookActivity",
            otel.name = Self::SPAN_NAME,
            party_size = party_size,
        ),
    )]
    pub async fn book_activity(
        activity_id: api::activity::Id,
        date: Date,
        party_size: i32,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_company().await?;
        let party_size = api::quantity(party_size).map_err(ctx.error())?;

        ctx.service()
            .execute(command::BookActivity {
                company_id: my_id,
                activity_id: activity_id.into(),
                date,
                party_size,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Books the event offered by the accepted `Proposal` for the calling
    /// `Company`.
    ///
    /// Returns the already existing `Booking` of the `Proposal`, if any.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Proposal`, its `Rfq` or `Activity` does not
    ///                 exist;
    /// - `UNAUTHORIZED` - the `Rfq` is issued by another `Company`;
    /// - `INVALID_STATE` - the `Proposal` is not accepted;
    /// - `CAPACITY_EXCEEDED` - the party doesn't fit into the `Activity`;
    /// - `INVALID_INPUT` - the total price is too large.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "bookFromProposal",
            otel.name = Self::SPAN_NAME,
            party_size = party_size,
            proposal_id = %proposal_id,
        ),
    )]
    pub async fn book_from_proposal(
        proposal_id: api::proposal::Id,
        party_size: i32,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_company().await?;
        let party_size = api::quantity(party_size).map_err(ctx.error())?;

        ctx.service()
            .execute(command::BookFromProposal {
                company_id: my_id,
                proposal_id: proposal_id.into(),
                party_size,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Booking` of the calling `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Booking` does not exist;
    /// - `UNAUTHORIZED` - the `Booking` is made by another `Company`.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "cancelBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::CancelBooking {
                booking_id: booking_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Confirms the `Booking` of an event provided by the calling `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `NOT_FOUND` - the `Booking` does not exist;
    /// - `UNAUTHORIZED` - the event is provided by another `Supplier`;
    /// - `INVALID_STATE` - the `Booking` is cancelled or rejected.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "confirmBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn confirm_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::ConfirmBooking {
                booking_id: booking_id.into(),
                supplier_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Rejects the pending `Booking` of an event provided by the calling
    /// `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Supplier-Id` header is missing;
    /// - `NOT_FOUND` - the `Booking` does not exist;
    /// - `UNAUTHORIZED` - the event is provided by another `Supplier`;
    /// - `INVALID_STATE` - the `Booking` is not pending.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "rejectBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reject_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_supplier().await?;

        ctx.service()
            .execute(command::RejectBooking {
                booking_id: booking_id.into(),
                supplier_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a `Payment` of the `Booking` of the calling `Company`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Booking` does not exist;
    /// - `UNAUTHORIZED` - the `Booking` is made by another `Company`;
    /// - `INVALID_STATE` - the `Booking` is cancelled or rejected;
    /// - `DUPLICATE_PAYMENT` - the `Booking` has a `Payment` already.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "createPayment",
            method = ?method,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_payment(
        booking_id: api::booking::Id,
        method: api::payment::Method,
        description: Option<api::payment::Description>,
        invoice_email: Option<api::scalar::Email>,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::CreatePayment {
                booking_id: booking_id.into(),
                company_id: my_id,
                method: method.into(),
                description: description.map(Into::into),
                invoice_email: invoice_email.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Starts the `Payment` of the calling `Company` with the payment
    /// gateway.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Payment` does not exist;
    /// - `UNAUTHORIZED` - the `Payment` is made by another `Company`;
    /// - `INVALID_STATE` - the `Payment` cannot be started from its status;
    /// - `PAYMENT_GATEWAY` - the payment gateway has failed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "startPayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn start_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::payment::StartResult, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::StartPayment {
                payment_id: payment_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|out| api::payment::StartResult {
                payment: out.payment.into(),
                client_secret: out.client_secret.to_string(),
            })
    }

    /// Confirms the started `Payment` of the calling `Company` with the
    /// payment gateway, confirming its `Booking` on success.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - the `Payment` does not exist;
    /// - `UNAUTHORIZED` - the `Payment` is made by another `Company`;
    /// - `INVALID_STATE` - the `Payment` is not started;
    /// - `PAYMENT_GATEWAY` - the payment gateway has failed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "confirmPayment",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
        ),
    )]
    pub async fn confirm_payment(
        payment_id: api::payment::Id,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        let my_id = ctx.current_company().await?;

        ctx.service()
            .execute(command::ConfirmPayment {
                payment_id: payment_id.into(),
                company_id: my_id,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records the outcome of the `Payment` reported by the payment gateway.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_FOUND` - the `Payment` or its `Booking` does not exist;
    /// - `INVALID_STATE` - the `Payment` cannot move into the `status`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePaymentState",
            otel.name = Self::SPAN_NAME,
            payment_id = %payment_id,
            status = ?status,
        ),
    )]
    pub async fn update_payment_state(
        payment_id: api::payment::Id,
        status: api::payment::Status,
        gateway_payment_id: Option<api::payment::GatewayPaymentId>,
        gateway_transaction_id: Option<api::payment::GatewayTransactionId>,
        ctx: &Context,
    ) -> Result<api::Payment, Error> {
        ctx.service()
            .execute(command::UpdatePaymentState {
                payment_id: payment_id.into(),
                status: status.into(),
                gateway_payment_id: gateway_payment_id.map(Into::into),
                gateway_transaction_id: gateway_transaction_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Leaves a `Review` of the calling `Company` on the `Activity` and/or
    /// the `Supplier`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `AUTHORIZATION_REQUIRED` - the `X-Company-Id` header is missing;
    /// - `NOT_FOUND` - any of the referred entities does not exist;
    /// - `INVALID_INPUT` - neither target is provided or the `score` is out
    ///                     of `1..=5` range.
    #[tracing::instrument(
        skip_all,
        fields(
            activity_id = ?activity_id,
            gql.name = "createReview",
            otel.name = Self::SPAN_NAME,
            score = score,
            supplier_id = ?supplier_id,
        ),
    )]
    pub async fn create_review(
        activity_id: Option<api::activity::Id>,
        supplier_id: Option<api::supplier::Id>,
        score: i32,
        comment: Option<api::review::Comment>,
        ctx: &Context,
    ) -> Result<api::Review, Error> {
        let my_id = ctx.current_company().await?;
        let score = api::quantity(score).map_err(ctx.error())?;

        ctx.service()
            .execute(command::CreateReview {
                company_id: my_id,
                activity_id: activity_id.map(Into::into),
                supplier_id: supplier_id.map(Into::into),
                score,
                comment: comment.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

define_error! {
    enum CommandError {
        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Referred entity does not exist"]
        NotFound,

        #[code = "INVALID_STATE"]
        #[status = CONFLICT]
        #[message = "Operation is not allowed in the current state"]
        InvalidState,

        #[code = "RFQ_NOT_OPEN"]
        #[status = CONFLICT]
        #[message = "`Rfq` doesn't accept proposals"]
        RfqNotOpen,

        #[code = "CAPACITY_EXCEEDED"]
        #[status = CONFLICT]
        #[message = "Party doesn't fit into the `Activity`"]
        CapacityExceeded,

        #[code = "DUPLICATE_PAYMENT"]
        #[status = CONFLICT]
        #[message = "`Booking` has a `Payment` already"]
        DuplicatePayment,

        #[code = "UNAUTHORIZED"]
        #[status = FORBIDDEN]
        #[message = "Caller doesn't own the resource"]
        Unauthorized,

        #[code = "INVALID_INPUT"]
        #[status = BAD_REQUEST]
        #[message = "Provided input is invalid"]
        InvalidInput,
    }
}

impl CommandError {
    /// Converts this [`CommandError`] into an [`Error`] with the message of
    /// the provided `cause`.
    fn describing(self, cause: &impl fmt::Display) -> Error {
        Error {
            message: cause.to_string(),
            ..Error::from(self)
        }
    }
}

impl AsError for command::create_company::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_supplier::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::create_activity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositivePrice(_) => E::InvalidInput.describing(self),
            Self::SupplierNotExists(_) => E::NotFound.describing(self),
        })
    }
}

impl AsError for command::review_activity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_) => E::NotFound.describing(self),
            Self::AlreadyReviewed(..) => E::InvalidState.describing(self),
        })
    }
}

impl AsError for command::create_rfq::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::CompanyNotExists(_) => E::NotFound.describing(self),
            Self::NonPositiveBudget(_) => E::InvalidInput.describing(self),
        })
    }
}

impl AsError for command::cancel_rfq::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotRfqOwner(..) => E::Unauthorized.describing(self),
            Self::RfqNotOpen(..) => E::RfqNotOpen.describing(self),
            Self::RfqNotExists(_) => E::NotFound.describing(self),
        })
    }
}

impl AsError for command::submit_proposal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_)
            | Self::RfqNotExists(_)
            | Self::SupplierNotExists(_) => E::NotFound.describing(self),
            Self::NonPositivePrice(_) => E::InvalidInput.describing(self),
            Self::NotActivityOwner(..) => E::Unauthorized.describing(self),
            Self::RfqNotOpen(..) => E::RfqNotOpen.describing(self),
        })
    }
}

impl AsError for command::update_proposal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NonPositivePrice(_) => E::InvalidInput.describing(self),
            Self::NotProposalOwner(..) => E::Unauthorized.describing(self),
            Self::ProposalNotExists(_) => E::NotFound.describing(self),
            Self::ProposalNotPending(..) => E::InvalidState.describing(self),
        })
    }
}

impl AsError for command::accept_proposal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_)
            | Self::ProposalNotExists(_)
            | Self::RfqNotExists(_) => E::NotFound.describing(self),
            Self::Price(activity::PriceError::CapacityExceeded(_)) => {
                E::CapacityExceeded.describing(self)
            }
            Self::Price(activity::PriceError::Overflow(_)) => {
                E::InvalidInput.describing(self)
            }
            Self::NotRfqOwner(..) => E::Unauthorized.describing(self),
            Self::ProposalNotPending(..) => E::InvalidState.describing(self),
            Self::RfqNotOpen(..) => E::RfqNotOpen.describing(self),
        })
    }
}

impl AsError for command::reject_proposal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::NotRfqOwner(..) => E::Unauthorized.describing(self),
            Self::ProposalNotExists(_) => E::NotFound.describing(self),
            Self::ProposalNotPending(..) => E::InvalidState.describing(self),
        })
    }
}

impl AsError for command::book_activity::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_) | Self::CompanyNotExists(_) => {
                E::NotFound.describing(self)
            }
            Self::Price(activity::PriceError::CapacityExceeded(_)) => {
                E::CapacityExceeded.describing(self)
            }
            Self::Price(activity::PriceError::Overflow(_)) => {
                E::InvalidInput.describing(self)
            }
        })
    }
}

impl AsError for command::book_from_proposal::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_) | Self::ProposalNotExists(_) => {
                E::NotFound.describing(self)
            }
            Self::Price(activity::PriceError::CapacityExceeded(_)) => {
                E::CapacityExceeded.describing(self)
            }
            Self::Price(activity::PriceError::Overflow(_)) => {
                E::InvalidInput.describing(self)
            }
            Self::NotRfqOwner(..) => E::Unauthorized.describing(self),
            Self::ProposalNotAccepted(..) => E::InvalidState.describing(self),
        })
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => E::NotFound.describing(self),
            Self::NotBookingOwner(..) => E::Unauthorized.describing(self),
        })
    }
}

impl AsError for command::confirm_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingClosed(..) => E::InvalidState.describing(self),
            Self::BookingNotExists(_) => E::NotFound.describing(self),
            Self::NotBookingSupplier(..) => E::Unauthorized.describing(self),
        })
    }
}

impl AsError for command::reject_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => E::NotFound.describing(self),
            Self::BookingNotPending(..) => E::InvalidState.describing(self),
            Self::NotBookingSupplier(..) => E::Unauthorized.describing(self),
        })
    }
}

impl AsError for command::create_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => E::NotFound.describing(self),
            Self::BookingNotPayable(..) => E::InvalidState.describing(self),
            Self::DuplicatePayment(_) => E::DuplicatePayment.describing(self),
            Self::NotBookingOwner(..) => E::Unauthorized.describing(self),
        })
    }
}

impl AsError for command::start_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PaymentGateway(e) => return e.try_as_error(),
            Self::NotPaymentOwner(..) => E::Unauthorized.describing(self),
            Self::NotStartable(..) => E::InvalidState.describing(self),
            Self::PaymentNotExists(_) => E::NotFound.describing(self),
        })
    }
}

impl AsError for command::confirm_payment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PaymentGateway(e) => return e.try_as_error(),
            Self::UpdateState(e) => return e.try_as_error(),
            Self::NotPaymentOwner(..) => E::Unauthorized.describing(self),
            Self::NotStarted(..) => E::InvalidState.describing(self),
            Self::PaymentNotExists(_) => E::NotFound.describing(self),
        })
    }
}

impl AsError for command::update_payment_state::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) | Self::PaymentNotExists(_) => {
                E::NotFound.describing(self)
            }
            Self::InvalidTransition { .. } => E::InvalidState.describing(self),
        })
    }
}

impl AsError for command::create_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use CommandError as E;

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ActivityNotExists(_)
            | Self::CompanyNotExists(_)
            | Self::SupplierNotExists(_) => E::NotFound.describing(self),
            Self::NoTarget => E::InvalidInput.describing(self),
        })
    }
}
