//! [`Command`] definition.

pub mod accept_proposal;
pub mod book_activity;
pub mod book_from_proposal;
pub mod cancel_booking;
pub mod cancel_rfq;
pub mod confirm_booking;
pub mod confirm_payment;
pub mod create_activity;
pub mod create_company;
pub mod create_payment;
pub mod create_review;
pub mod create_rfq;
pub mod create_supplier;
pub mod reject_booking;
pub mod reject_proposal;
pub mod review_activity;
pub mod start_payment;
pub mod submit_proposal;
pub mod update_payment_state;
pub mod update_proposal;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{activity, proposal, supplier, Activity, Booking, Proposal},
    infra::{database, Database},
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    accept_proposal::AcceptProposal, book_activity::BookActivity,
    book_from_proposal::BookFromProposal, cancel_booking::CancelBooking,
    cancel_rfq::CancelRfq, confirm_booking::ConfirmBooking,
    confirm_payment::ConfirmPayment,
    create_activity::CreateActivity, create_company::CreateCompany,
    create_payment::CreatePayment, create_review::CreateReview,
    create_rfq::CreateRfq, create_supplier::CreateSupplier,
    reject_booking::RejectBooking, reject_proposal::RejectProposal,
    review_activity::ReviewActivity,
    start_payment::StartPayment, submit_proposal::SubmitProposal,
    update_payment_state::UpdatePaymentState,
    update_proposal::UpdateProposal,
};

/// Resolves the supplier providing the event of the provided [`Booking`].
///
/// That's the owner of the booked [`Activity`] or, lacking one, the author of
/// the [`Proposal`] the [`Booking`] is derived from.
async fn booking_supplier<Db>(
    db: &Db,
    booking: &Booking,
) -> Result<Option<supplier::Id>, Traced<database::Error>>
where
    Db: Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        >,
{
    if let Some(id) = booking.activity_id {
        return db
            .execute(Select(By::<Option<Activity>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())
            .map(|a| a.map(|a| a.supplier_id));
    }
    if let Some(id) = booking.proposal_id {
        return db
            .execute(Select(By::<Option<Proposal>, _>::new(id)))
            .await
            .map_err(tracerr::wrap!())
            .map(|p| p.map(|p| p.supplier_id));
    }
    Ok(None)
}
