//! [`Proposal`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{proposal, rfq, supplier, Proposal},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

use super::{money, quantity};

/// Columns of the `proposals` table in the order [`proposal()`] expects.
const COLUMNS: &str = "\
    id, rfq_id, supplier_id, activity_id, \
    total_price, total_price_currency, \
    price_per_person, price_per_person_currency, \
    description, extras, conditions, \
    proposed_date, duration, status, \
    created_at, updated_at, expires_at";

/// Reads a [`Proposal`] out of the provided [`Row`].
fn proposal(row: &Row) -> Proposal {
    Proposal {
        id: row.get("id"),
        rfq_id: row.get("rfq_id"),
        supplier_id: row.get("supplier_id"),
        activity_id: row.get("activity_id"),
        total_price: money(row, "total_price"),
        price_per_person: money(row, "price_per_person"),
        description: row.get("description"),
        extras: row.get("extras"),
        conditions: row.get("conditions"),
        proposed_date: row.get("proposed_date"),
        duration: quantity(row, "duration"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        expires_at: row.get("expires_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<proposal::Id, Proposal>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[proposal::Id]>,
{
    type Ok = HashMap<proposal::Id, Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<proposal::Id, Proposal>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[proposal::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM proposals \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(proposal)
            .map(|p| (p.id, p))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Proposal>, proposal::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<proposal::Id, Proposal>, [proposal::Id; 1]>>,
        Ok = HashMap<proposal::Id, Proposal>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Proposal>, proposal::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Proposal>, rfq::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Proposal>, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let rfq_id: rfq::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM proposals \
             WHERE rfq_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&rfq_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(proposal)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Proposal>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Proposal>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Proposal>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let supplier_id: supplier::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM proposals \
             WHERE supplier_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(proposal)
            .collect())
    }
}

impl<C> Database<Insert<Proposal>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Proposal>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(proposal): Insert<Proposal>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(proposal)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Proposal>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(proposal): Update<Proposal>,
    ) -> Result<Self::Ok, Self::Err> {
        let Proposal {
            id,
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
            status,
            created_at,
            updated_at,
            expires_at,
        } = proposal;

        let duration = duration.map(|d| i32::from(d.get()));

        const SQL: &str = "\
            INSERT INTO proposals (\
                id, rfq_id, supplier_id, activity_id, \
                total_price, total_price_currency, \
                price_per_person, price_per_person_currency, \
                description, extras, conditions, \
                proposed_date, duration, status, \
                created_at, updated_at, expires_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::NUMERIC, $6::INT2, \
                $7::NUMERIC, $8::INT2, \
                $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
                $12::DATE, $13::INT4, $14::INT2, \
                $15::TIMESTAMPTZ, $16::TIMESTAMPTZ, $17::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET activity_id = EXCLUDED.activity_id, \
                total_price = EXCLUDED.total_price, \
                total_price_currency = EXCLUDED.total_price_currency, \
                price_per_person = EXCLUDED.price_per_person, \
                price_per_person_currency = \
                    EXCLUDED.price_per_person_currency, \
                description = EXCLUDED.description, \
                extras = EXCLUDED.extras, \
                conditions = EXCLUDED.conditions, \
                proposed_date = EXCLUDED.proposed_date, \
                duration = EXCLUDED.duration, \
                status = EXCLUDED.status, \
                updated_at = EXCLUDED.updated_at, \
                expires_at = EXCLUDED.expires_at";
        self.exec(
            SQL,
            &[
                &id,
                &rfq_id,
                &supplier_id,
                &activity_id,
                &total_price.amount,
                &total_price.currency,
                &price_per_person.amount,
                &price_per_person.currency,
                &description,
                &extras,
                &conditions,
                &proposed_date,
                &duration,
                &status,
                &created_at,
                &updated_at,
                &expires_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C>
    Database<
        Update<By<read::proposal::ExpiredCount, proposal::ExpirationDateTime>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::proposal::ExpiredCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<
            By<read::proposal::ExpiredCount, proposal::ExpirationDateTime>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let now: proposal::ExpirationDateTime = by.into_inner();

        const SQL: &str = "\
            UPDATE proposals \
            SET status = $1::INT2, \
                updated_at = $3::TIMESTAMPTZ \
            WHERE status = $2::INT2 \
              AND expires_at <= $3::TIMESTAMPTZ";
        self.exec(
            SQL,
            &[
                &proposal::Status::Expired,
                &proposal::Status::Pending,
                &now,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(Into::into)
    }
}
