//! [`Log`] notifier definitions.

use common::operations::Notify;
use tracerr::Traced;
use tracing as log;

use super::{Error, Event, Notifier};

/// [`Notifier`] only logging [`Event`]s.
///
/// Suitable until a real delivery channel is plugged in.
#[derive(Clone, Copy, Debug, Default)]
pub struct Log;

impl Notifier<Notify<Event>> for Log {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Notify(event): Notify<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        match &event {
            Event::RfqCreated { rfq } => log::info!(
                event = event.name(),
                rfq.id = %rfq.id,
                company.id = %rfq.company_id,
                "RFQ created",
            ),
            Event::ProposalReceived { proposal, rfq } => log::info!(
                event = event.name(),
                proposal.id = %proposal.id,
                rfq.id = %rfq.id,
                company.id = %rfq.company_id,
                "proposal received",
            ),
            Event::ProposalAccepted {
                proposal,
                supplier_email,
            } => log::info!(
                event = event.name(),
                proposal.id = %proposal.id,
                to = %supplier_email,
                "proposal accepted",
            ),
            Event::BookingConfirmed {
                booking,
                company_email,
                supplier_name,
            } => log::info!(
                event = event.name(),
                booking.id = %booking.id,
                to = %company_email,
                supplier = ?supplier_name,
                "booking confirmed",
            ),
        }
        Ok(())
    }
}
