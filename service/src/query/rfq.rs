//! [`Query`] collection related to [`Rfq`].

use common::operations::By;

use crate::{
    domain::{company, rfq, Rfq},
    read,
};
#[cfg(doc)]
use crate::{domain::Company, Query};

use super::DatabaseQuery;

/// Queries an [`Rfq`] by its [`rfq::Id`].
pub type ById = DatabaseQuery<By<Option<Rfq>, rfq::Id>>;

/// Queries all [`Rfq`]s of a [`Company`].
pub type ByCompany = DatabaseQuery<By<Vec<Rfq>, company::Id>>;

/// Queries a page of [`Rfq`]s.
pub type List =
    DatabaseQuery<By<read::rfq::list::Page, read::rfq::list::Selector>>;

/// Queries total count of [`Rfq`] list items.
pub type TotalCount =
    DatabaseQuery<By<read::rfq::list::TotalCount, read::rfq::list::Filter>>;
