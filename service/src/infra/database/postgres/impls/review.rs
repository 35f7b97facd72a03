//! [`Review`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{activity, review, supplier, Review},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `reviews` table in the order [`review()`] expects.
const COLUMNS: &str = "\
    id, company_id, activity_id, supplier_id, \
    score, comment, created_at";

/// Reads a [`Review`] out of the provided [`Row`].
fn review(row: &Row) -> Review {
    Review {
        id: row.get("id"),
        company_id: row.get("company_id"),
        activity_id: row.get("activity_id"),
        supplier_id: row.get("supplier_id"),
        score: review::Score::try_from(i32::from(row.get::<_, i16>("score")))
            .expect("`score` out of range"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<Review>, activity::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, activity::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let activity_id: activity::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reviews \
             WHERE activity_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&activity_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(review)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Review>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let supplier_id: supplier::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reviews \
             WHERE supplier_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&supplier_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(review)
            .collect())
    }
}

impl<C> Database<Insert<Review>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(review): Insert<Review>,
    ) -> Result<Self::Ok, Self::Err> {
        let Review {
            id,
            company_id,
            activity_id,
            supplier_id,
            score,
            comment,
            created_at,
        } = review;

        let score = i16::from(u8::from(score));

        const SQL: &str = "\
            INSERT INTO reviews (\
                id, company_id, activity_id, supplier_id, \
                score, comment, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::INT2, $6::VARCHAR, $7::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &company_id,
                &activity_id,
                &supplier_id,
                &score,
                &comment,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
