//! Read entities definitions.

pub mod proposal;
pub mod rfq;
