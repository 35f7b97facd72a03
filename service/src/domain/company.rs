//! [`Company`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use super::{define_id, define_text, Email};

/// Company organizing team-building events and buying them from suppliers.
#[derive(Clone, Debug)]
pub struct Company {
    /// ID of this [`Company`].
    pub id: Id,

    /// [`Name`] of this [`Company`].
    pub name: Name,

    /// [`Email`] this [`Company`] is notified at.
    pub email: Email,

    /// [`DateTime`] when this [`Company`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Company`]."]
    Id
}

define_text! {
    #[doc = "Name of a [`Company`]."]
    Name(max = 256)
}

/// [`DateTime`] when a [`Company`] was created.
pub type CreationDateTime = DateTimeOf<(Company, unit::Creation)>;
