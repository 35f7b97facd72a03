//! [`Command`] for cancelling an [`Rfq`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{company, proposal, rfq, Proposal, Rfq},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for cancelling an [`Rfq`] by its company.
///
/// Pending [`Proposal`]s of the [`Rfq`] are rejected along, if the
/// [`rfq::CancellationPolicy`] of the [`Service`] says so.
#[derive(Clone, Copy, Debug)]
pub struct CancelRfq {
    /// ID of the [`Rfq`] to be cancelled.
    pub rfq_id: rfq::Id,

    /// ID of the company cancelling the [`Rfq`].
    pub company_id: company::Id,
}

impl<Db, Ntf, Gw> Command<CancelRfq> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Rfq, rfq::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Proposal>, rfq::Id>>,
            Ok = Vec<Proposal>,
            Err = Traced<database::Error>,
        > + Database<Insert<Rfq>, Err = Traced<database::Error>>
        + Database<Insert<Proposal>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rfq;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CancelRfq) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CancelRfq { rfq_id, company_id } = cmd;

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

        // Avoid concurrent actions upon the same `Rfq` and its proposals.
        tx.execute(Lock(By::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut rfq = tx
            .execute(Select(By::<Option<Rfq>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RfqNotExists(rfq_id))
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        rfq.cancel(now.coerce())
            .map_err(|s| tracerr::new!(E::RfqNotOpen(rfq_id, s)))?;

        tx.execute(Insert(rfq.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if self.config().rfq_cancellation
            == rfq::CancellationPolicy::RejectPendingProposals
        {
            let proposals = tx
                .execute(Select(By::<Vec<Proposal>, _>::new(rfq_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            for mut p in proposals {
                if p.resolve(proposal::Status::Rejected, now.coerce()).is_ok() {
                    log::debug!(
                        "`Proposal(id: {})` rejected along with \
                         `Rfq(id: {rfq_id})`",
                        p.id,
                    );
                    tx.execute(Insert(p))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                }
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rfq)
    }
}

/// Error of [`CancelRfq`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Company doesn't own the [`Rfq`].
    #[display("`Company(id: {_0})` doesn't own `Rfq(id: {_1})`")]
    NotRfqOwner(company::Id, rfq::Id),

    /// [`Rfq`] is closed or cancelled already.
    #[display("`Rfq(id: {_0})` is {_1} already")]
    RfqNotOpen(rfq::Id, rfq::Status),

    /// [`Rfq`] with the provided ID does not exist.
    #[display("`Rfq(id: {_0})` does not exist")]
    RfqNotExists(#[error(not(source))] rfq::Id),
}
