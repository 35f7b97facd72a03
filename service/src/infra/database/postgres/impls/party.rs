//! [`Company`]- and [`Supplier`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{company, supplier, Company, Supplier},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Company>, company::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Company>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Company>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: company::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, email, created_at \
            FROM companies \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Company {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Company>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(company): Insert<Company>,
    ) -> Result<Self::Ok, Self::Err> {
        let Company {
            id,
            name,
            email,
            created_at,
        } = company;

        const SQL: &str = "\
            INSERT INTO companies (id, name, email, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email";
        self.exec(SQL, &[&id, &name, &email, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Option<Supplier>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Supplier>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: supplier::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, email, created_at \
            FROM suppliers \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Supplier {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Supplier>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(supplier): Insert<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        let Supplier {
            id,
            name,
            email,
            created_at,
        } = supplier;

        const SQL: &str = "\
            INSERT INTO suppliers (id, name, email, created_at) \
            VALUES ($1::UUID, $2::VARCHAR, $3::VARCHAR, $4::TIMESTAMPTZ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                email = EXCLUDED.email";
        self.exec(SQL, &[&id, &name, &email, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
