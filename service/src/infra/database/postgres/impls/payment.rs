//! [`Payment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, payment, Payment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

use super::money;

/// Columns of the `payments` table in the order [`payment()`] expects.
const COLUMNS: &str = "\
    id, booking_id, amount, amount_currency, method, status, \
    gateway_payment_id, gateway_transaction_id, \
    description, invoice_email, \
    created_at, updated_at, completed_at";

/// Reads a [`Payment`] out of the provided [`Row`].
fn payment(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        amount: money(row, "amount"),
        method: row.get("method"),
        status: row.get("status"),
        gateway_payment_id: row.get("gateway_payment_id"),
        gateway_transaction_id: row.get("gateway_transaction_id"),
        description: row.get("description"),
        invoice_email: row.get("invoice_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        completed_at: row.get("completed_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(payment))
    }
}

impl<C> Database<Select<By<Option<Payment>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let booking_id: booking::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM payments \
             WHERE booking_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(payment))
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Payment>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(payment)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(payment): Update<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Payment {
            id,
            booking_id,
            amount,
            method,
            status,
            gateway_payment_id,
            gateway_transaction_id,
            description,
            invoice_email,
            created_at,
            updated_at,
            completed_at,
        } = payment;

        const SQL: &str = "\
            INSERT INTO payments (\
                id, booking_id, amount, amount_currency, method, status, \
                gateway_payment_id, gateway_transaction_id, \
                description, invoice_email, \
                created_at, updated_at, completed_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::INT2, $5::INT2, \
                $6::INT2, \
                $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::VARCHAR, \
                $11::TIMESTAMPTZ, $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                gateway_payment_id = EXCLUDED.gateway_payment_id, \
                gateway_transaction_id = EXCLUDED.gateway_transaction_id, \
                updated_at = EXCLUDED.updated_at, \
                completed_at = EXCLUDED.completed_at";
        self.exec(
            SQL,
            &[
                &id,
                &booking_id,
                &amount.amount,
                &amount.currency,
                &method,
                &status,
                &gateway_payment_id,
                &gateway_transaction_id,
                &description,
                &invoice_email,
                &created_at,
                &updated_at,
                &completed_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Payment, payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Payment, payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: payment::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM payments \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
