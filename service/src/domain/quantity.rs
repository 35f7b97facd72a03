//! Bounded numeric quantities shared across the domain.

use std::{num::NonZeroU16, str::FromStr};

use derive_more::{Display, Into};

/// Number of people taking part in an event. Always positive.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[into(u16)]
pub struct PartySize(u16);

impl PartySize {
    /// Creates a new [`PartySize`] if the given `size` is positive.
    #[must_use]
    pub fn new(size: u16) -> Option<Self> {
        (size > 0).then_some(Self(size))
    }

    /// Returns the number of people.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for PartySize {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or("`PartySize` must be within `1..=65535`")
    }
}

impl FromStr for PartySize {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `PartySize`")
    }
}

/// Maximal number of people an activity can host. Always positive.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[into(u16)]
pub struct Capacity(NonZeroU16);

impl Capacity {
    /// Creates a new [`Capacity`] if the given `max` is positive.
    #[must_use]
    pub fn new(max: u16) -> Option<Self> {
        NonZeroU16::new(max).map(Self)
    }

    /// Returns the maximal number of people.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Indicates whether a party of the given size fits into this
    /// [`Capacity`].
    #[must_use]
    pub const fn fits(self, party: PartySize) -> bool {
        party.get() <= self.get()
    }
}

impl TryFrom<i32> for Capacity {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or("`Capacity` must be within `1..=65535`")
    }
}

/// Positive duration in whole minutes.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[into(u16)]
pub struct Minutes(u16);

impl Minutes {
    /// Creates new [`Minutes`] if the given `minutes` are positive.
    #[must_use]
    pub fn new(minutes: u16) -> Option<Self> {
        (minutes > 0).then_some(Self(minutes))
    }

    /// Returns the number of minutes.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for Minutes {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or("`Minutes` must be within `1..=65535`")
    }
}

/// Search radius in kilometers around a location.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[into(u16)]
pub struct RadiusKm(u16);

impl RadiusKm {
    /// Radius used when none is specified.
    pub const DEFAULT: Self = Self(50);

    /// Creates a new [`RadiusKm`].
    #[must_use]
    pub const fn new(km: u16) -> Self {
        Self(km)
    }

    /// Returns the number of kilometers.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Default for RadiusKm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for RadiusKm {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map(Self)
            .map_err(|_| "`RadiusKm` must be within `0..=65535`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Capacity, PartySize};

    #[test]
    fn party_size_is_positive() {
        assert!(PartySize::new(0).is_none());
        assert!(PartySize::try_from(-3).is_err());
        assert!(PartySize::try_from(70_000).is_err());
        assert_eq!(PartySize::new(10).map(PartySize::get), Some(10));
    }

    #[test]
    fn capacity_boundary() {
        let capacity = Capacity::new(20).unwrap();
        assert!(capacity.fits(PartySize::new(1).unwrap()));
        assert!(capacity.fits(PartySize::new(20).unwrap()));
        assert!(!capacity.fits(PartySize::new(21).unwrap()));
        assert!(Capacity::new(0).is_none());
    }
}
