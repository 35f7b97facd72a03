//! [`Company`]- and [`Supplier`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{company, supplier, Company, Supplier},
    infra::{
        database::{
            self,
            memory::{Memory, Storage},
        },
        Database,
    },
};

impl<S> Database<Select<By<Option<Company>, company::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Company>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Company>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.companies.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Company>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(company): Insert<Company>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.companies.insert(company.id, company));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Select<By<Option<Supplier>, supplier::Id>>> for Memory<S>
where
    S: Storage,
{
    type Ok = Option<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Supplier>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| s.suppliers.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S> Database<Insert<Supplier>> for Memory<S>
where
    S: Storage,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(supplier): Insert<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|s| {
            drop(s.suppliers.insert(supplier.id, supplier));
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
