//! Infrastructure layer.

pub mod database;
pub mod notifier;
pub mod payment_gateway;

#[cfg(feature = "memory")]
pub use self::database::{memory, Memory};
pub use self::{
    database::Database, notifier::Notifier, payment_gateway::PaymentGateway,
};
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
