//! [`Command`] for creating a new [`Supplier`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{supplier, Supplier, Email},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Supplier`].
#[derive(Clone, Debug)]
pub struct CreateSupplier {
    /// Name of a new [`Supplier`].
    pub name: supplier::Name,

    /// [`Email`] of a new [`Supplier`].
    pub email: Email,
}

impl<Db, Ntf, Gw> Command<CreateSupplier> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Supplier>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Supplier;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSupplier { name, email } = cmd;

        let supplier = Supplier {
            id: supplier::Id::new(),
            name,
            email,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(supplier.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(supplier)
    }
}

/// Error of [`CreateSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
