//! [`Query`] collection related to [`Supplier`].

use common::operations::By;

use crate::domain::{supplier, Supplier};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Supplier`] by its [`supplier::Id`].
pub type ById = DatabaseQuery<By<Option<Supplier>, supplier::Id>>;
