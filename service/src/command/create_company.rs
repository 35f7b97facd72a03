//! [`Command`] for creating a new [`Company`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{company, Company, Email},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Company`].
#[derive(Clone, Debug)]
pub struct CreateCompany {
    /// Name of a new [`Company`].
    pub name: company::Name,

    /// [`Email`] of a new [`Company`].
    pub email: Email,
}

impl<Db, Ntf, Gw> Command<CreateCompany> for Service<Db, Ntf, Gw>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Company>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Company;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCompany,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCompany { name, email } = cmd;

        let company = Company {
            id: company::Id::new(),
            name,
            email,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(company.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(company)
    }
}

/// Error of [`CreateCompany`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
