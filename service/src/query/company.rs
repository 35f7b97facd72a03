//! [`Query`] collection related to [`Company`].

use common::operations::By;

use crate::domain::{company, Company};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Company`] by its [`company::Id`].
pub type ById = DatabaseQuery<By<Option<Company>, company::Id>>;
