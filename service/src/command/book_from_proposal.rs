//! [`Command`] for booking an accepted [`Proposal`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        activity, company, proposal, rfq, Activity, Booking, PartySize,
        Proposal, Rfq,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for booking the event offered by an accepted [`Proposal`].
///
/// Idempotent: the already existing [`Booking`] of the [`Proposal`] is
/// returned as is.
#[derive(Clone, Copy, Debug)]
pub struct BookFromProposal {
    /// ID of the company booking the event.
    pub company_id: company::Id,

    /// ID of the accepted [`Proposal`].
    pub proposal_id: proposal::Id,

    /// Number of people taking part in the event.
    pub party_size: PartySize,
}

impl<Db, Ntf, Gw> Command<BookFromProposal> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Rfq, rfq::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, proposal::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: BookFromProposal,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let BookFromProposal {
            company_id,
            proposal_id,
            party_size,
        } = cmd;

        let proposal = self
            .database()
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        let rfq_id = proposal.rfq_id;
        let owner = self
            .database()
            .execute(Select(By::<Option<Rfq>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .map(|rfq| rfq.company_id);
        if owner != Some(company_id) {
            return Err(tracerr::new!(E::NotRfqOwner(company_id, rfq_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid creating duplicate bookings of the same `Proposal`.
        tx.execute(Lock(By::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Some(booking) = tx
            .execute(Select(By::<Option<Booking>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(booking);
        }

        let proposal = tx
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        let status = proposal.status_at(DateTime::now());
        if status != proposal::Status::Accepted {
            return Err(tracerr::new!(E::ProposalNotAccepted(
                proposal_id,
                status,
            )));
        }

        let activity = if let Some(id) = proposal.activity_id {
            Some(
                tx.execute(Select(By::<Option<Activity>, _>::new(id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::ActivityNotExists(id))
                    .map_err(tracerr::wrap!())?,
            )
        } else {
            None
        };
        let booking = Booking::from_proposal(
            company_id,
            &proposal,
            activity.as_ref(),
            party_size,
        )
        .map_err(|e| tracerr::new!(E::Price(e)))?;

        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`BookFromProposal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] referred by the [`Proposal`] does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// Offered [`Activity`] cannot be priced for the party.
    #[display("Cannot book `Proposal`: {_0}")]
    Price(activity::PriceError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Company doesn't own the [`Rfq`] of the [`Proposal`].
    #[display("`Company(id: {_0})` doesn't own `Rfq(id: {_1})`")]
    NotRfqOwner(company::Id, rfq::Id),

    /// [`Proposal`] is not accepted.
    #[display("`Proposal(id: {_0})` is {_1}, not accepted")]
    ProposalNotAccepted(proposal::Id, proposal::Status),

    /// [`Proposal`] with the provided ID does not exist.
    #[display("`Proposal(id: {_0})` does not exist")]
    ProposalNotExists(#[error(not(source))] proposal::Id),
}
