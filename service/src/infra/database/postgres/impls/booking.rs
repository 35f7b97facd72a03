//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, company, proposal, supplier, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::{money, quantity};

/// Columns of the `bookings` table in the order [`booking()`] expects.
const COLUMNS: &str = "\
    id, company_id, activity_id, proposal_id, \
    date, party_size, \
    total_price, total_price_currency, \
    status, created_at, updated_at";

/// Reads a [`Booking`] out of the provided [`Row`].
fn booking(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        company_id: row.get("company_id"),
        activity_id: row.get("activity_id"),
        proposal_id: row.get("proposal_id"),
        date: row.get("date"),
        party_size: quantity(row, "party_size")
            .expect("`party_size` is NOT NULL"),
        total_price: money(row, "total_price"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(booking))
    }
}

impl<C> Database<Select<By<Option<Booking>, proposal::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, proposal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let proposal_id: proposal::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE proposal_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&proposal_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(booking))
    }
}

impl<C> Database<Select<By<Vec<Booking>, company::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let company_id: company::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE company_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&company_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(booking)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Booking>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let supplier_id: supplier::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE activity_id IN (\
                       SELECT id FROM activities WHERE supplier_id = $1::UUID\
                   ) \
                OR (activity_id IS NULL AND proposal_id IN (\
                       SELECT id FROM proposals WHERE supplier_id = $1::UUID\
                   )) \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(booking)
            .collect())
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            company_id,
            activity_id,
            proposal_id,
            date,
            party_size,
            total_price,
            status,
            created_at,
            updated_at,
        } = booking;

        let party_size = i32::from(party_size.get());

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, company_id, activity_id, proposal_id, \
                date, party_size, \
                total_price, total_price_currency, \
                status, created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::DATE, $6::INT4, \
                $7::NUMERIC, $8::INT2, \
                $9::INT2, $10::TIMESTAMPTZ, $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &company_id,
                &activity_id,
                &proposal_id,
                &date,
                &party_size,
                &total_price.amount,
                &total_price.currency,
                &status,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
