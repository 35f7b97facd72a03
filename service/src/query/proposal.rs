//! [`Query`] collection related to [`Proposal`].

use common::operations::By;

use crate::domain::{proposal, rfq, supplier, Proposal};
#[cfg(doc)]
use crate::{
    domain::{Rfq, Supplier},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Proposal`] by its [`proposal::Id`].
pub type ById = DatabaseQuery<By<Option<Proposal>, proposal::Id>>;

/// Queries all [`Proposal`]s answering an [`Rfq`].
pub type ByRfq = DatabaseQuery<By<Vec<Proposal>, rfq::Id>>;

/// Queries all [`Proposal`]s made by a [`Supplier`].
pub type BySupplier = DatabaseQuery<By<Vec<Proposal>, supplier::Id>>;
