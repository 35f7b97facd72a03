//! [`Review`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A review left by a company.
#[derive(Clone, Debug, From)]
pub struct Review(domain::Review);

/// A review left by a company.
#[graphql_object(context = Context)]
impl Review {
    /// Unique identifier of this `Review`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the `Company` left this `Review`.
    pub fn company_id(&self) -> api::company::Id {
        self.0.company_id.into()
    }

    /// ID of the reviewed `Activity`, if any.
    pub fn activity_id(&self) -> Option<api::activity::Id> {
        self.0.activity_id.map(Into::into)
    }

    /// ID of the reviewed `Supplier`, if any.
    pub fn supplier_id(&self) -> Option<api::supplier::Id> {
        self.0.supplier_id.map(Into::into)
    }

    /// Score from `1` to `5` given by this `Review`.
    pub fn score(&self) -> i32 {
        u8::from(self.0.score).into()
    }

    /// Comment of this `Review`.
    pub fn comment(&self) -> Option<Comment> {
        self.0.comment.clone().map(Into::into)
    }

    /// `DateTime` when this `Review` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Review`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::review::Id)]
#[into(domain::review::Id)]
#[graphql(name = "ReviewId", transparent)]
pub struct Id(Uuid);

/// Comment of a `Review`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ReviewComment",
    with = scalar::Via::<domain::review::Comment>,
)]
pub struct Comment(domain::review::Comment);
