//! [`Query`] collection related to [`Activity`].

use common::operations::By;

use crate::domain::{activity, supplier, Activity};
#[cfg(doc)]
use crate::{domain::Supplier, Query};

use super::DatabaseQuery;

/// Queries an [`Activity`] by its [`activity::Id`].
pub type ById = DatabaseQuery<By<Option<Activity>, activity::Id>>;

/// Queries all [`Activity`]s of a [`Supplier`].
pub type BySupplier = DatabaseQuery<By<Vec<Activity>, supplier::Id>>;
