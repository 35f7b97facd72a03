//! [`Proposal`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{proposal, rfq, supplier, Proposal},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
        },
        Database,
    },
    read,
};

impl<S> Database<Select<By<Option<Proposal>, proposal::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Proposal>, proposal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.proposals.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Proposal>, rfq::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Proposal>, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let rfq_id = by.into_inner();
        self.read(|s| {
            let mut proposals = s
                .proposals
                .values()
                .filter(|p| p.rfq_id == rfq_id)
                .cloned()
                .collect::<Vec<_>>();
            proposals.sort_by_key(|p| (p.created_at, p.id));
            proposals
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Proposal>, supplier::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Proposal>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let supplier_id = by.into_inner();
        self.read(|s| {
            let mut proposals = s
                .proposals
                .values()
                .filter(|p| p.supplier_id == supplier_id)
                .cloned()
                .collect::<Vec<_>>();
            proposals.sort_by_key(|p| (p.created_at, p.id));
            proposals
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Proposal>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(proposal): Insert<Proposal>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.proposals.insert(proposal.id, proposal));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S>
    Database<
        Update<By<read::proposal::ExpiredCount, proposal::ExpirationDateTime>>,
    > for Memory<S>
where
    S: Storage,
{
    type Ok = read::proposal::ExpiredCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<
            By<read::proposal::ExpiredCount, proposal::ExpirationDateTime>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let now = by.into_inner();
        self.write(|s| {
            let mut count = 0_u64;
            for p in s.proposals.values_mut() {
                if p.status == proposal::Status::Pending
                    && p.expires_at.is_reached_by(now)
                {
                    p.status = proposal::Status::Expired;
                    p.updated_at = now.coerce();
                    count += 1;
                }
            }
            Ok(read::proposal::ExpiredCount::from(count))
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
