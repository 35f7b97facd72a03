//! [`Rfq`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select},
    pagination::Direction,
};
use tracerr::Traced;

use crate::{
    domain::{company, rfq, Rfq},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
        },
        Database,
    },
    read,
};

impl<S> Database<Select<By<Option<Rfq>, rfq::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Rfq>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rfq>, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.rfqs.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Vec<Rfq>, company::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Vec<Rfq>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rfq>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let company_id = by.into_inner();
        self.read(|s| {
            let mut rfqs = s
                .rfqs
                .values()
                .filter(|r| r.company_id == company_id)
                .cloned()
                .collect::<Vec<_>>();
            rfqs.sort_by_key(|r| (r.created_at, r.id));
            rfqs
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<read::rfq::list::Page, read::rfq::list::Selector>>>
    for Memory<S>
where
    S: Storage,
{
    type Ok = read::rfq::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rfq::list::Page, read::rfq::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rfq::list::Selector { arguments, filter } = by.into_inner();

        let mut rows = self
            .read(|s| {
                s.rfqs
                    .values()
                    .filter(|r| filter.matches(r))
                    .filter(|r| {
                        arguments.cursor.map_or(true, |c| {
                            match arguments.direction {
                                Direction::Forward => r.id > c,
                                Direction::Backward => r.id < c,
                            }
                        })
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await
            .map_err(tracerr::wrap!())?;
        rows.sort_by_key(|r| r.id);
        if arguments.direction == Direction::Backward {
            rows.reverse();
        }
        rows.truncate(arguments.fetch_limit());

        Ok(read::rfq::list::Page::from_rows(
            &arguments,
            rows.into_iter().map(|r| (r.id, r)).collect(),
        ))
    }
}

impl<S>
    Database<Select<By<read::rfq::list::TotalCount, read::rfq::list::Filter>>>
    for Memory<S>
where
    S: Storage,
{
    type Ok = read::rfq::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rfq::list::TotalCount, read::rfq::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.read(|s| s.rfqs.values().filter(|r| filter.matches(r)).count())
            .await
            .map_err(tracerr::wrap!())
            .map(|n| i32::try_from(n).unwrap_or(i32::MAX).into())
    }
}

impl<S> Database<Insert<Rfq>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rfq): Insert<Rfq>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.rfqs.insert(rfq.id, rfq));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Lock<By<Rfq, rfq::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Rfq, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
