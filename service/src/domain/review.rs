//! [`Review`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, Into};

use super::{activity, company, define_id, define_text, supplier};

/// Feedback of a company about an activity or a supplier.
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the company left this [`Review`].
    pub company_id: company::Id,

    /// ID of the reviewed activity, if any.
    pub activity_id: Option<activity::Id>,

    /// ID of the reviewed supplier, if any.
    pub supplier_id: Option<supplier::Id>,

    /// [`Score`] given by this [`Review`].
    pub score: Score,

    /// [`Comment`] of this [`Review`], if any.
    pub comment: Option<Comment>,

    /// [`DateTime`] when this [`Review`] was created.
    pub created_at: CreationDateTime,
}

/// Score of a [`Review`] within `1..=5` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd)]
#[into(u8)]
pub struct Score(u8);

impl Score {
    /// Creates a new [`Score`] if the provided `value` is within `1..=5`
    /// range.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }
}

impl TryFrom<i32> for Score {
    type Error = &'static str;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or("`Score` must be within `1..=5`")
    }
}

define_id! {
    #[doc = "ID of a [`Review`]."]
    Id
}

define_text! {
    #[doc = "Comment of a [`Review`]."]
    Comment(max = 4096)
}

/// [`DateTime`] when a [`Review`] was created.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Score;

    #[test]
    fn score_bounds() {
        assert!(Score::new(0).is_none());
        assert!(Score::new(6).is_none());
        assert!(Score::try_from(-1).is_err());
        assert_eq!(Score::new(5).map(u8::from), Some(5));
        assert_eq!(Score::try_from(1).map(u8::from), Ok(1));
    }
}
