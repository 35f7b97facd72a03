//! [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

mod activity;
mod booking;
mod party;
mod payment;
mod proposal;
mod review;
mod rfq;

use std::{collections::HashMap, hash::Hash};

use super::Error;

/// Ensures no other row of the `table` than the one with the `id` has the
/// `key`.
fn ensure_unique<Id, T, K>(
    table: &HashMap<Id, T>,
    id: &Id,
    key: impl Fn(&T) -> Option<K>,
    value: Option<K>,
    constraint: &'static str,
) -> Result<(), Error>
where
    Id: Eq + Hash,
    K: PartialEq,
{
    let Some(value) = value else {
        return Ok(());
    };
    let taken = table
        .iter()
        .any(|(i, row)| i != id && key(row).as_ref() == Some(&value));
    if taken {
        return Err(Error::UniqueViolation(constraint));
    }
    Ok(())
}
