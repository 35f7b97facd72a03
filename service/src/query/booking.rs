//! [`Query`] collection related to [`Booking`].

use common::operations::By;

use crate::domain::{booking, company, proposal, supplier, Booking};
#[cfg(doc)]
use crate::{
    domain::{Activity, Company, Proposal, Supplier},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Booking`] by its [`booking::Id`].
pub type ById = DatabaseQuery<By<Option<Booking>, booking::Id>>;

/// Queries the [`Booking`] derived from a [`Proposal`].
pub type ByProposal = DatabaseQuery<By<Option<Booking>, proposal::Id>>;

/// Queries all [`Booking`]s of a [`Company`].
pub type ByCompany = DatabaseQuery<By<Vec<Booking>, company::Id>>;

/// Queries all [`Booking`]s of events provided by a [`Supplier`].
///
/// A [`Booking`] is provided by the [`Supplier`] owning its [`Activity`] or,
/// lacking one, the [`Supplier`] made its [`Proposal`].
pub type BySupplier = DatabaseQuery<By<Vec<Booking>, supplier::Id>>;
