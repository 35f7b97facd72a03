//! [`Query`] collection related to [`Payment`].

use common::operations::By;

use crate::domain::{booking, payment, Payment};
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries a [`Payment`] by its [`payment::Id`].
pub type ById = DatabaseQuery<By<Option<Payment>, payment::Id>>;

/// Queries the [`Payment`] of a [`Booking`].
pub type ByBooking = DatabaseQuery<By<Option<Payment>, booking::Id>>;
