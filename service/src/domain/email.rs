//! [`Email`] definitions.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

/// Email address of a company or a supplier, used to address notifications.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$")
                .expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

#[cfg(test)]
mod spec {
    use super::Email;

    #[test]
    fn validates_format() {
        assert!(Email::new("events@acme.pt").is_some());
        assert!(Email::new("first.last@sub.acme.co.uk").is_some());

        assert!(Email::new("acme.pt").is_none());
        assert!(Email::new("a@b").is_none());
        assert!(Email::new("a b@acme.pt").is_none());
        assert!(Email::new("a@@acme.pt").is_none());
        assert!(Email::new("a@acme..pt").is_none());
    }
}
