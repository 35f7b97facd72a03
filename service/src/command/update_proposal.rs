//! [`Command`] for updating a pending [`Proposal`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{proposal, rfq, supplier, Minutes, Proposal, Rfq},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating terms of a pending [`Proposal`] by its supplier.
///
/// Only the provided fields are changed.
#[derive(Clone, Debug)]
pub struct UpdateProposal {
    /// ID of the [`Proposal`] to be updated.
    pub proposal_id: proposal::Id,

    /// ID of the supplier updating the [`Proposal`].
    pub supplier_id: supplier::Id,

    /// New total price of the whole event.
    pub total_price: Option<Money>,

    /// New price of the event for a single person.
    pub price_per_person: Option<Money>,

    /// New description of the [`Proposal`].
    pub description: Option<proposal::Description>,

    /// New extras included into the [`Proposal`].
    pub extras: Option<proposal::Extras>,

    /// New conditions of the [`Proposal`].
    pub conditions: Option<proposal::Conditions>,

    /// New date the event is proposed to take place on.
    pub proposed_date: Option<Date>,

    /// New duration of the event.
    pub duration: Option<Minutes>,
}

impl<Db, Ntf, Gw> Command<UpdateProposal> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Proposal>, proposal::Id>>,
            Ok = Option<Proposal>,
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
        cmd: UpdateProposal,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProposal {
            proposal_id,
            supplier_id,
            total_price,
            price_per_person,
            description,
            extras,
            conditions,
            proposed_date,
            duration,
        } = cmd;

        for price in total_price.iter().chain(&price_per_person) {
            if !price.is_positive() {
                return Err(tracerr::new!(E::NonPositivePrice(*price)));
            }
        }

        let proposal = self
            .database()
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;
        if proposal.supplier_id != supplier_id {
            return Err(tracerr::new!(E::NotProposalOwner(
                supplier_id,
                proposal_id,
            )));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with a decision upon the `Proposal`.
        tx.execute(Lock(By::new(proposal.rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut proposal = tx
            .execute(Select(By::<Option<Proposal>, _>::new(proposal_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProposalNotExists(proposal_id))
            .map_err(tracerr::wrap!())?;

        let now = DateTime::now();
        if !proposal.is_pending_at(now) {
            return Err(tracerr::new!(E::ProposalNotPending(
                proposal_id,
                proposal.status_at(now),
            )));
        }

        if let Some(price) = total_price {
            proposal.total_price = price;
        }
        if let Some(price) = price_per_person {
            proposal.price_per_person = price;
        }
        if let Some(desc) = description {
            proposal.description = desc;
        }
        if let Some(extras) = extras {
            proposal.extras = Some(extras);
        }
        if let Some(conditions) = conditions {
            proposal.conditions = Some(conditions);
        }
        if let Some(date) = proposed_date {
            proposal.proposed_date = date;
        }
        if let Some(duration) = duration {
            proposal.duration = Some(duration);
        }
        proposal.updated_at = now.coerce();

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

/// Error of [`UpdateProposal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Price of the [`Proposal`] is not positive.
    #[display("`Proposal` price must be positive, got {_0}")]
    NonPositivePrice(#[error(not(source))] Money),

    /// Supplier doesn't own the [`Proposal`].
    #[display("`Supplier(id: {_0})` doesn't own `Proposal(id: {_1})`")]
    NotProposalOwner(supplier::Id, proposal::Id),

    /// [`Proposal`] with the provided ID does not exist.
    #[display("`Proposal(id: {_0})` does not exist")]
    ProposalNotExists(#[error(not(source))] proposal::Id),

    /// [`Proposal`] is not pending anymore.
    #[display("`Proposal(id: {_0})` is {_1}")]
    ProposalNotPending(proposal::Id, proposal::Status),
}
