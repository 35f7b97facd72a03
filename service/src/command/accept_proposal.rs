//! [`Command`] for accepting a [`Proposal`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Notify, Select, Transact, Transacted,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        activity, company, proposal, rfq, supplier, Activity, Booking,
        Proposal, Rfq, Supplier,
    },
    infra::{database, notifier, Database, Notifier},
    Service,
};

use super::Command;

/// [`Command`] for accepting a [`Proposal`] by the company owning its [`Rfq`].
///
/// Atomically:
/// - moves the [`Proposal`] into [`proposal::Status::Accepted`];
/// - closes its [`Rfq`];
/// - rejects all the other pending [`Proposal`]s of the [`Rfq`];
/// - derives a [`Booking`] from the [`Proposal`], unless it exists already.
#[derive(Clone, Copy, Debug)]
pub struct AcceptProposal {
    /// ID of the [`Proposal`] to be accepted.
    pub proposal_id: proposal::Id,

    /// ID of the company accepting the [`Proposal`].
    pub company_id: company::Id,
}

/// Result of [`AcceptProposal`] [`Command`] execution.
#[derive(Clone, Debug)]
pub struct Output {
    /// Accepted [`Proposal`].
    pub proposal: Proposal,

    /// [`Booking`] derived from the accepted [`Proposal`].
    pub booking: Booking,
}

impl<Db, Ntf, Gw> Command<AcceptProposal> for Service<Db, Ntf, Gw>
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
        > + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Rfq, rfq::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Proposal>, rfq::Id>>,
            Ok = Vec<Proposal>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, proposal::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Insert<Proposal>, Err = Traced<database::Error>>
        + Database<Insert<Rfq>, Err = Traced<database::Error>>
        + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<notifier::Event>,
        Ok = (),
        Err = Traced<notifier::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AcceptProposal,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AcceptProposal {
            proposal_id,
            company_id,
        } = cmd;

        let proposal = self
            .database()
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        let rfq_id = proposal.rfq_id;
        let rfq = self
            .database()
            .execute(Select(By::<Option<Rfq>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RfqNotExists(rfq_id))
            .map_err(tracerr::wrap!())?;
        if rfq.company_id != company_id {
            return Err(tracerr::new!(E::NotRfqOwner(company_id, rfq_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Only a single `Proposal` of the `Rfq` may be accepted.
        tx.execute(Lock(By::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let now = DateTime::now();

        let mut proposal = tx
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        proposal
            .resolve(proposal::Status::Accepted, now.coerce())
            .map_err(|s| tracerr::new!(E::ProposalNotPending(proposal_id, s)))?;

        let mut rfq = tx
            .execute(Select(By::<Option<Rfq>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RfqNotExists(rfq_id))
            .map_err(tracerr::wrap!())?;
        rfq.close(now.coerce())
            .map_err(|s| tracerr::new!(E::RfqNotOpen(rfq_id, s)))?;

        tx.execute(Insert(proposal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(rfq.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let siblings = tx
            .execute(Select(By::<Vec<Proposal>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for mut p in siblings {
            if p.id == proposal_id
                || p.resolve(proposal::Status::Rejected, now.coerce()).is_err()
            {
                continue;
            }
            tx.execute(Insert(p))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let existing = tx
            .execute(Select(By::<Option<Booking>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let booking = if let Some(b) = existing {
            b
        } else {
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
                rfq.company_id,
                &proposal,
                activity.as_ref(),
                rfq.party_size,
            )
            .map_err(|e| tracerr::new!(E::Price(e)))?;
            tx.execute(Insert(booking.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            booking
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        match self
            .database()
            .execute(Select(By::<Option<Supplier>, _>::new(
                proposal.supplier_id,
            )))
            .await
        {
            Ok(Some(supplier)) => {
                self.notify(notifier::Event::ProposalAccepted {
                    proposal: proposal.clone(),
                    supplier_email: supplier.email,
                })
                .await;
            }
            Ok(None) => log::warn!(
                "`Supplier(id: {})` of accepted `Proposal(id: {proposal_id})` \
                 does not exist",
                proposal.supplier_id,
            ),
            Err(e) => log::warn!(
                "failed to load `Supplier(id: {})` for notification: {e}",
                proposal.supplier_id,
            ),
        }

        Ok(Output { proposal, booking })
    }
}

/// Error of [`AcceptProposal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] referred by the [`Proposal`] does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// Offered [`Activity`] cannot be priced for the party.
    #[display("Cannot book accepted `Proposal`: {_0}")]
    Price(activity::PriceError),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Company doesn't own the [`Rfq`] of the [`Proposal`].
    #[display("`Company(id: {_0})` doesn't own `Rfq(id: {_1})`")]
    NotRfqOwner(company::Id, rfq::Id),

    /// [`Proposal`] with the provided ID does not exist.
    #[display("`Proposal(id: {_0})` does not exist")]
    ProposalNotExists(#[error(not(source))] proposal::Id),

    /// [`Proposal`] is not pending anymore.
    #[display("`Proposal(id: {_0})` is {_1}")]
    ProposalNotPending(proposal::Id, proposal::Status),

    /// [`Rfq`] doesn't accept proposals anymore.
    #[display("`Rfq(id: {_0})` is {_1} and doesn't accept proposals")]
    RfqNotOpen(rfq::Id, rfq::Status),

    /// [`Rfq`] with the provided ID does not exist.
    #[display("`Rfq(id: {_0})` does not exist")]
    RfqNotExists(#[error(not(source))] rfq::Id),
}
