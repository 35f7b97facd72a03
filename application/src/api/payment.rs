//! [`Payment`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// A payment of a `Booking`.
#[derive(Clone, Debug, From)]
pub struct Payment(domain::Payment);

/// A payment of a `Booking`.
#[graphql_object(context = Context)]
impl Payment {
    /// Unique identifier of this `Payment`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Booking` this `Payment` pays.
    pub fn booking_id(&self) -> api::booking::Id {
        self.0.booking_id.into()
    }

    /// Amount of this `Payment`.
    pub fn amount(&self) -> Money {
        self.0.amount
    }

    /// Method of this `Payment`.
    pub fn method(&self) -> Method {
        self.0.method.into()
    }

    /// Status of this `Payment`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Payment ID assigned by the payment gateway, if any.
    pub fn gateway_payment_id(&self) -> Option<GatewayPaymentId> {
        self.0.gateway_payment_id.clone().map(Into::into)
    }

    /// Transaction ID assigned by the payment gateway, if any.
    pub fn gateway_transaction_id(&self) -> Option<GatewayTransactionId> {
        self.0.gateway_transaction_id.clone().map(Into::into)
    }

    /// Description of this `Payment`, if any.
    pub fn description(&self) -> Option<Description> {
        self.0.description.clone().map(Into::into)
    }

    /// Email the invoice of this `Payment` is sent to, if any.
    pub fn invoice_email(&self) -> Option<scalar::Email> {
        self.0.invoice_email.clone().map(Into::into)
    }

    /// `DateTime` when this `Payment` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when this `Payment` was modified last time.
    pub fn updated_at(&self) -> DateTime {
        self.0.updated_at.coerce()
    }

    /// `DateTime` when this `Payment` was completed, if it was.
    pub fn completed_at(&self) -> Option<DateTime> {
        self.0.completed_at.map(|at| at.coerce())
    }

    /// `Booking` this `Payment` pays.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Payment.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        ctx.service()
            .execute(query::booking::ById::by(self.0.booking_id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|b| b.map(Into::into))
    }
}

/// Result of starting a `Payment` with the payment gateway.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "StartPaymentResult", context = Context)]
pub struct StartResult {
    /// Started `Payment`.
    pub payment: Payment,

    /// Client secret the payment should be finished with on the client side.
    pub client_secret: String,
}

/// Unique identifier of a `Payment`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::payment::Id)]
#[into(domain::payment::Id)]
#[graphql(name = "PaymentId", transparent)]
pub struct Id(Uuid);

/// Description of a `Payment`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "PaymentDescription",
    with = scalar::Via::<domain::payment::Description>,
)]
pub struct Description(domain::payment::Description);

/// Payment ID assigned by a payment gateway.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::payment::GatewayPaymentId>)]
pub struct GatewayPaymentId(domain::payment::GatewayPaymentId);

/// Transaction ID assigned by a payment gateway.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<domain::payment::GatewayTransactionId>)]
pub struct GatewayTransactionId(domain::payment::GatewayTransactionId);

/// Method of a `Payment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PaymentMethod")]
pub enum Method {
    /// Credit or debit card.
    Card,

    /// Bank transfer.
    BankTransfer,

    /// MB WAY mobile payment.
    MbWay,

    /// PayPal wallet.
    PayPal,
}

impl From<domain::payment::Method> for Method {
    fn from(method: domain::payment::Method) -> Self {
        use domain::payment::Method as M;
        match method {
            M::Card => Self::Card,
            M::BankTransfer => Self::BankTransfer,
            M::MbWay => Self::MbWay,
            M::PayPal => Self::PayPal,
        }
    }
}

impl From<Method> for domain::payment::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Card => Self::Card,
            Method::BankTransfer => Self::BankTransfer,
            Method::MbWay => Self::MbWay,
            Method::PayPal => Self::PayPal,
        }
    }
}

/// Status of a `Payment`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "PaymentStatus")]
pub enum Status {
    /// Created, but not started yet.
    Pending,

    /// Being processed by the payment gateway.
    Processing,

    /// Completed successfully.
    Completed,

    /// Failed and may be retried.
    Failed,

    /// Cancelled.
    Cancelled,

    /// Money has been returned.
    Refunded,
}

impl From<domain::payment::Status> for Status {
    fn from(status: domain::payment::Status) -> Self {
        use domain::payment::Status as S;
        match status {
            S::Pending => Self::Pending,
            S::Processing => Self::Processing,
            S::Completed => Self::Completed,
            S::Failed => Self::Failed,
            S::Cancelled => Self::Cancelled,
            S::Refunded => Self::Refunded,
        }
    }
}

impl From<Status> for domain::payment::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Pending => Self::Pending,
            Status::Processing => Self::Processing,
            Status::Completed => Self::Completed,
            Status::Failed => Self::Failed,
            Status::Cancelled => Self::Cancelled,
            Status::Refunded => Self::Refunded,
        }
    }
}
