//! [`Proposal`]-related read definitions.

use derive_more::{Display, From, Into};

#[cfg(doc)]
use crate::domain::Proposal;

/// Number of [`Proposal`]s marked as expired at once.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct ExpiredCount(u64);
