//! [`Rfq`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{company, rfq, RadiusKm, Rfq},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

use super::{money, quantity};

/// Columns of the `rfqs` table in the order [`rfq()`] expects.
const COLUMNS: &str = "\
    id, company_id, party_size, \
    preferred_date, alternate_date, \
    location, radius_km, \
    max_budget, max_budget_currency, \
    objective, preferences, category, climate, max_duration, \
    status, created_at, updated_at";

/// Reads an [`Rfq`] out of the provided [`Row`].
fn rfq(row: &Row) -> Rfq {
    Rfq {
        id: row.get("id"),
        company_id: row.get("company_id"),
        party_size: quantity(row, "party_size")
            .expect("`party_size` is NOT NULL"),
        preferred_date: row.get("preferred_date"),
        alternate_date: row.get("alternate_date"),
        location: row.get("location"),
        radius_km: RadiusKm::new(
            u16::try_from(row.get::<_, i32>("radius_km"))
                .expect("`radius_km` overflow"),
        ),
        max_budget: money(row, "max_budget"),
        objective: row.get("objective"),
        preferences: row.get("preferences"),
        category: row.get("category"),
        climate: row.get("climate"),
        max_duration: quantity(row, "max_duration"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<rfq::Id, Rfq>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[rfq::Id]>,
{
    type Ok = HashMap<rfq::Id, Rfq>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<rfq::Id, Rfq>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[rfq::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rfqs \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(rfq)
            .map(|r| (r.id, r))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Rfq>, rfq::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<rfq::Id, Rfq>, [rfq::Id; 1]>>,
        Ok = HashMap<rfq::Id, Rfq>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Rfq>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rfq>, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Rfq>, company::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Rfq>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rfq>, company::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let company_id: company::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rfqs \
             WHERE company_id = $1::UUID \
             ORDER BY created_at ASC, id ASC",
        );
        Ok(self
            .query(&sql, &[&company_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(rfq)
            .collect())
    }
}

impl<C> Database<Select<By<read::rfq::list::Page, read::rfq::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rfq::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rfq::list::Page, read::rfq::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rfq::list::Selector {
            arguments,
            filter:
                read::rfq::list::Filter {
                    status,
                    company_id,
                    location,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.fetch_limit()).unwrap();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let company_idx = company_id.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let location_pattern = location.as_ref().map(|l| {
            let l: &str = l.as_ref();
            FuzzPattern::new(l)
        });
        let location_idx = location_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rfqs \
             WHERE true \
                   {cursor} \
                   {status_filtering} \
                   {company_filtering} \
                   {location_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.direction.operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            company_filtering =
                company_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND company_id = ${idx}::UUID"))
                }),
            location_filtering =
                location_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(location) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
            order = arguments.direction.sql_order(),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        Ok(read::rfq::list::Page::from_rows(
            &arguments,
            rows.iter().map(rfq).map(|r| (r.id, r)).collect(),
        ))
    }
}

impl<C>
    Database<Select<By<read::rfq::list::TotalCount, read::rfq::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::rfq::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rfq::list::TotalCount, read::rfq::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rfq::list::Filter {
            status,
            company_id,
            location,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];

        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let company_idx = company_id.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let location_pattern = location.as_ref().map(|l| {
            let l: &str = l.as_ref();
            FuzzPattern::new(l)
        });
        let location_idx = location_pattern.as_ref().map(|p| {
            ps.push(p);
            ps.len()
        });

        let sql = format!(
            "SELECT COUNT(*)::INT4 \
             FROM rfqs \
             WHERE true \
                   {status_filtering} \
                   {company_filtering} \
                   {location_filtering}",
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            company_filtering =
                company_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND company_id = ${idx}::UUID"))
                }),
            location_filtering =
                location_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!(
                        "AND LOWER(location) SIMILAR TO LOWER(${idx}::VARCHAR)"
                    ))
                }),
        );
        self.query_opt(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Insert<Rfq>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Rfq>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rfq): Insert<Rfq>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(rfq)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Rfq>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rfq): Update<Rfq>,
    ) -> Result<Self::Ok, Self::Err> {
        let Rfq {
            id,
            company_id,
            party_size,
            preferred_date,
            alternate_date,
            location,
            radius_km,
            max_budget,
            objective,
            preferences,
            category,
            climate,
            max_duration,
            status,
            created_at,
            updated_at,
        } = rfq;

        let party_size = i32::from(party_size.get());
        let radius_km = i32::from(radius_km.get());
        let max_duration = max_duration.map(|d| i32::from(d.get()));

        const SQL: &str = "\
            INSERT INTO rfqs (\
                id, company_id, party_size, \
                preferred_date, alternate_date, \
                location, radius_km, \
                max_budget, max_budget_currency, \
                objective, preferences, category, climate, max_duration, \
                status, created_at, updated_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::INT4, \
                $4::DATE, $5::DATE, \
                $6::VARCHAR, $7::INT4, \
                $8::NUMERIC, $9::INT2, \
                $10::VARCHAR, $11::VARCHAR, $12::VARCHAR, $13::INT2, \
                $14::INT4, \
                $15::INT2, $16::TIMESTAMPTZ, $17::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET party_size = EXCLUDED.party_size, \
                preferred_date = EXCLUDED.preferred_date, \
                alternate_date = EXCLUDED.alternate_date, \
                location = EXCLUDED.location, \
                radius_km = EXCLUDED.radius_km, \
                max_budget = EXCLUDED.max_budget, \
                max_budget_currency = EXCLUDED.max_budget_currency, \
                objective = EXCLUDED.objective, \
                preferences = EXCLUDED.preferences, \
                category = EXCLUDED.category, \
                climate = EXCLUDED.climate, \
                max_duration = EXCLUDED.max_duration, \
                status = EXCLUDED.status, \
                updated_at = EXCLUDED.updated_at";
        self.exec(
            SQL,
            &[
                &id,
                &company_id,
                &party_size,
                &preferred_date,
                &alternate_date,
                &location,
                &radius_km,
                &max_budget.amount,
                &max_budget.currency,
                &objective,
                &preferences,
                &category,
                &climate,
                &max_duration,
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

impl<C> Database<Lock<By<Rfq, rfq::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Rfq, rfq::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: rfq::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rfqs \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
