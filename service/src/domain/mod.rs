//! Domain definitions.

pub mod activity;
pub mod booking;
pub mod company;
mod email;
mod macros;
pub mod payment;
pub mod proposal;
pub mod quantity;
pub mod review;
pub mod rfq;
pub mod supplier;

use self::macros::{define_id, define_text};

pub use self::{
    activity::Activity,
    booking::Booking,
    company::Company,
    email::Email,
    payment::Payment,
    proposal::Proposal,
    quantity::{Capacity, Minutes, PartySize, RadiusKm},
    review::Review,
    rfq::Rfq,
    supplier::Supplier,
};
