//! [`Command`] for rejecting a [`Proposal`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{company, proposal, rfq, Proposal, Rfq},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for rejecting a pending [`Proposal`] by the company owning its
/// [`Rfq`].
#[derive(Clone, Copy, Debug)]
pub struct RejectProposal {
    /// ID of the [`Proposal`] to be rejected.
    pub proposal_id: proposal::Id,

    /// ID of the company rejecting the [`Proposal`].
    pub company_id: company::Id,
}

impl<Db, Ntf, Gw> Command<RejectProposal> for Service<Db, Ntf, Gw>
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
        > + Database<Insert<Proposal>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Proposal;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RejectProposal,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RejectProposal {
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

        // Avoid racing with an acceptance of a sibling `Proposal`.
        tx.execute(Lock(By::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut proposal = tx
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        proposal
            .resolve(proposal::Status::Rejected, DateTime::now().coerce())
            .map_err(|s| tracerr::new!(E::ProposalNotPending(proposal_id, s)))?;

        tx.execute(Insert(proposal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(proposal)
    }
}

/// Error of [`RejectProposal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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
}
