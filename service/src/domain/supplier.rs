//! [`Supplier`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use super::{define_id, define_text, Email};

/// Supplier offering bookable activities and answering RFQs with proposals.
#[derive(Clone, Debug)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    pub id: Id,

    /// [`Name`] of this [`Supplier`].
    pub name: Name,

    /// [`Email`] this [`Supplier`] is notified at.
    pub email: Email,

    /// [`DateTime`] when this [`Supplier`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Supplier`]."]
    Id
}

define_text! {
    #[doc = "Name of a [`Supplier`]."]
    Name(max = 256)
}

/// [`DateTime`] when a [`Supplier`] was created.
pub type CreationDateTime = DateTimeOf<(Supplier, unit::Creation)>;
