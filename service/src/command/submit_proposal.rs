//! [`Command`] for submitting a new [`Proposal`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Notify, Select, Transact, Transacted,
    },
    Date, DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        activity, proposal, rfq, supplier, Activity, Minutes, Proposal, Rfq,
        Supplier,
    },
    infra::{database, notifier, Database, Notifier},
    Service,
};

use super::Command;

/// [`Command`] for submitting a new [`Proposal`] answering an [`Rfq`].
#[derive(Clone, Debug)]
pub struct SubmitProposal {
    /// ID of the [`Rfq`] to be answered.
    pub rfq_id: rfq::Id,

    /// ID of the [`Supplier`] making the [`Proposal`].
    pub supplier_id: supplier::Id,

    /// ID of the offered [`Activity`], if any.
    ///
    /// Must be owned by the [`Supplier`].
    pub activity_id: Option<activity::Id>,

    /// Total price of the whole event.
    pub total_price: Money,

    /// Price of the event for a single person.
    pub price_per_person: Money,

    /// Description of the [`Proposal`].
    pub description: proposal::Description,

    /// Extras included into the [`Proposal`].
    pub extras: Option<proposal::Extras>,

    /// Conditions of the [`Proposal`].
    pub conditions: Option<proposal::Conditions>,

    /// Date the event is proposed to take place on.
    pub proposed_date: Date,

    /// Duration of the event.
    pub duration: Option<Minutes>,
}

impl<Db, Ntf, Gw> Command<SubmitProposal> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Activity>, activity::Id>>,
            Ok = Option<Activity>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Rfq, rfq::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rfq>, rfq::Id>>,
            Ok = Option<Rfq>,
            Err = Traced<database::Error>,
        > + Database<Insert<Rfq>, Err = Traced<database::Error>>
        + Database<Insert<Proposal>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<notifier::Event>,
        Ok = (),
        Err = Traced<notifier::Error>,
    >,
{
    type Ok = Proposal;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitProposal,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitProposal {
            rfq_id,
            supplier_id,
            activity_id,
            total_price,
            price_per_person,
            description,
            extras,
            conditions,
            proposed_date,
            duration,
        } = cmd;

        for price in [total_price, price_per_person] {
            if !price.is_positive() {
                return Err(tracerr::new!(E::NonPositivePrice(price)));
            }
        }

        self.database()
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        if let Some(activity_id) = activity_id {
            let activity = self
                .database()
                .execute(Select(By::<Option<Activity>, _>::new(activity_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ActivityNotExists(activity_id))
                .map_err(tracerr::wrap!())?;
            if activity.supplier_id != supplier_id {
                return Err(tracerr::new!(E::NotActivityOwner(
                    supplier_id,
                    activity_id,
                )));
            }
        }

        self.database()
            .execute(Select(By::<Option<Rfq>, _>::new(rfq_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RfqNotExists(rfq_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with acceptances and cancellations of the `Rfq`.
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
        if !rfq.accepts_proposals() {
            return Err(tracerr::new!(E::RfqNotOpen(rfq_id, rfq.status)));
        }

        let now = DateTime::now();
        let proposal = Proposal {
            id: proposal::Id::new(),
            rfq_id,
            supplier_id,
            activity_id,
            total_price,
            price_per_person,
            description,
            extras,
            conditions,
            proposed_date,
            duration,
            status: proposal::Status::Pending,
            created_at: now.coerce(),
            updated_at: now.coerce(),
            expires_at: (now + self.config().proposal_ttl).coerce(),
        };

        if rfq.receive_proposal(now.coerce()) {
            tx.execute(Insert(rfq.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }
        tx.execute(Insert(proposal.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.notify(notifier::Event::ProposalReceived {
            proposal: proposal.clone(),
            rfq,
        })
        .await;

        Ok(proposal)
    }
}

/// Error of [`SubmitProposal`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Activity`] with the provided ID does not exist.
    #[display("`Activity(id: {_0})` does not exist")]
    ActivityNotExists(#[error(not(source))] activity::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Price of the [`Proposal`] is not positive.
    #[display("`Proposal` price must be positive, got {_0}")]
    NonPositivePrice(#[error(not(source))] Money),

    /// [`Supplier`] doesn't own the offered [`Activity`].
    #[display("`Supplier(id: {_0})` doesn't own `Activity(id: {_1})`")]
    NotActivityOwner(supplier::Id, activity::Id),

    /// [`Rfq`] doesn't accept proposals anymore.
    #[display("`Rfq(id: {_0})` is {_1} and doesn't accept proposals")]
    RfqNotOpen(rfq::Id, rfq::Status),

    /// [`Rfq`] with the provided ID does not exist.
    #[display("`Rfq(id: {_0})` does not exist")]
    RfqNotExists(#[error(not(source))] rfq::Id),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}
