//! GraphQL API definitions.

pub mod activity;
pub mod booking;
pub mod company;
mod mutation;
pub mod payment;
pub mod proposal;
mod query;
pub mod review;
pub mod rfq;
pub mod scalar;
pub mod supplier;

use crate::{define_error, Context, Error};

pub use self::{
    activity::Activity, booking::Booking, company::Company,
    mutation::Mutation, payment::Payment, proposal::Proposal, query::Query,
    review::Review, rfq::Rfq, supplier::Supplier,
};

/// GraphQL subscriptions root.
///
/// Nothing is pushed to clients at the moment.
pub type Subscription = juniper::EmptySubscription<Context>;

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}

/// Converts the provided GraphQL `Int` argument into a bounded domain
/// quantity.
///
/// # Errors
///
/// With `INVALID_INPUT` code if the `value` is out of the quantity bounds.
pub(crate) fn quantity<T>(value: i32) -> Result<T, Error>
where
    T: TryFrom<i32, Error = &'static str>,
{
    T::try_from(value).map_err(|msg| Error {
        code: "INVALID_INPUT",
        status_code: http::StatusCode::BAD_REQUEST,
        message: msg.to_owned(),
        backtrace: None,
    })
}
