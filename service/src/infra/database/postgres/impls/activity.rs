//! [`Activity`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{activity, supplier, Activity},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::{money, quantity};

/// Columns of the `activities` table in the order [`activity()`] expects.
const COLUMNS: &str = "\
    id, supplier_id, name, \
    price_per_person, price_per_person_currency, \
    capacity, status, rating, reviews_count, \
    created_at";

/// Reads an [`Activity`] out of the provided [`Row`].
fn activity(row: &Row) -> Activity {
    Activity {
        id: row.get("id"),
        supplier_id: row.get("supplier_id"),
        name: row.get("name"),
        price_per_person: money(row, "price_per_person"),
        capacity: quantity(row, "capacity").expect("`capacity` is NOT NULL"),
        status: row.get("status"),
        rating: row.get("rating"),
        reviews_count: u32::try_from(row.get::<_, i64>("reviews_count"))
            .expect("`reviews_count` overflow"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<activity::Id, Activity>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[activity::Id]>,
{
    type Ok = HashMap<activity::Id, Activity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<activity::Id, Activity>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[activity::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM activities \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(activity)
            .map(|a| (a.id, a))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Activity>, activity::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<activity::Id, Activity>, [activity::Id; 1]>>,
        Ok = HashMap<activity::Id, Activity>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Activity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Activity>, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Activity>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Activity>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Activity>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let supplier_id: supplier::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM activities \
             WHERE supplier_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(activity)
            .collect())
    }
}

impl<C> Database<Insert<Activity>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Activity>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(activity): Insert<Activity>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(activity)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Activity>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(activity): Update<Activity>,
    ) -> Result<Self::Ok, Self::Err> {
        let Activity {
            id,
            supplier_id,
            name,
            price_per_person,
            capacity,
            status,
            rating,
            reviews_count,
            created_at,
        } = activity;

        let capacity = i32::from(capacity.get());
        let reviews_count = i64::from(reviews_count);

        const SQL: &str = "\
            INSERT INTO activities (\
                id, supplier_id, name, \
                price_per_person, price_per_person_currency, \
                capacity, status, rating, reviews_count, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, \
                $6::INT4, $7::INT2, $8::NUMERIC, $9::INT8, \
                $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                price_per_person = EXCLUDED.price_per_person, \
                price_per_person_currency = \
                    EXCLUDED.price_per_person_currency, \
                capacity = EXCLUDED.capacity, \
                status = EXCLUDED.status, \
                rating = EXCLUDED.rating, \
                reviews_count = EXCLUDED.reviews_count";
        self.exec(
            SQL,
            &[
                &id,
                &supplier_id,
                &name,
                &price_per_person.amount,
                &price_per_person.currency,
                &capacity,
                &status,
                &rating,
                &reviews_count,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Activity, activity::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Activity, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: activity::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM activities \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
