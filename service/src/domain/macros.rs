//! Macros for defining repetitive domain value types.

/// Defines a random UUID-based identifier of an entity.
macro_rules! define_id {
    (
        #[doc = $doc:literal]
        $name:ident
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            ::serde::Deserialize,
            ::derive_more::Display,
            Eq,
            ::derive_more::From,
            ::derive_more::FromStr,
            Hash,
            ::derive_more::Into,
            Ord,
            PartialEq,
            PartialOrd,
            ::serde::Serialize,
        )]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::ToSql, ::postgres_types::FromSql),
            postgres(transparent)
        )]
        #[doc = $doc]
        pub struct $name(::uuid::Uuid);

        impl $name {
            #[doc = concat!("Creates a new random [`", stringify!($name), "`].")]
            #[must_use]
            pub fn new() -> Self {
                Self(::uuid::Uuid::new_v4())
            }
        }
    };
}

/// Defines a validated free-text value.
///
/// The text must be non-empty, have no leading or trailing whitespace and
/// contain at most `max` characters.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident(max = $max:literal)
    ) => {
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        #[doc = $doc]
        pub struct $name(String);

        impl $name {
            #[doc = concat!(
                "Creates a new [`", stringify!($name), "`] if the given ",
                "`value` is valid.",
            )]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                Self::check(&value).then_some(Self(value))
            }

            #[doc = concat!(
                "Checks whether the given `value` is a valid [`",
                stringify!($name), "`].",
            )]
            fn check(value: &str) -> bool {
                value.trim() == value
                    && !value.is_empty()
                    && value.chars().count() <= $max
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}

pub(crate) use define_id;
pub(crate) use define_text;

#[cfg(test)]
mod spec {
    define_text! {
        #[doc = "Test text."]
        Text(max = 5)
    }

    #[test]
    fn text_validation() {
        assert!(Text::new("abcde").is_some());
        assert!(Text::new("äöüßé").is_some());
        assert!(Text::new("abcdef").is_none());
        assert!(Text::new("").is_none());
        assert!(Text::new(" ab").is_none());
        assert!(Text::new("ab\n").is_none());
        assert!("a b".parse::<Text>().is_ok());
    }
}
