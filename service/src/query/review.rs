//! [`Query`] collection related to [`Review`].

use common::operations::By;

use crate::domain::{activity, supplier, Review};
#[cfg(doc)]
use crate::{
    domain::{Activity, Supplier},
    Query,
};

use super::DatabaseQuery;

/// Queries all [`Review`]s of an [`Activity`].
pub type ByActivity = DatabaseQuery<By<Vec<Review>, activity::Id>>;

/// Queries all [`Review`]s given directly to a [`Supplier`].
pub type BySupplier = DatabaseQuery<By<Vec<Review>, supplier::Id>>;
