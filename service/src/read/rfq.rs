//! [`Rfq`]-related read definitions.

#[cfg(doc)]
use crate::domain::Rfq;

pub mod list {
    //! [`Rfq`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{company, rfq, Rfq};

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = Rfq;

    /// Cursor pointing to a specific [`Rfq`] in a list.
    pub type Cursor = rfq::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`rfq::Status`] to list [`Rfq`]s in.
        pub status: Option<rfq::Status>,

        /// ID of the company to list [`Rfq`]s of.
        pub company_id: Option<company::Id>,

        /// [`rfq::Location`] (or its part) to fuzzy search for.
        pub location: Option<rfq::Location>,
    }

    impl Filter {
        /// Indicates whether the provided [`Rfq`] passes this [`Filter`].
        ///
        /// [`Filter::location`] matches if any of its words is contained in
        /// the [`Rfq::location`], ignoring the case.
        #[must_use]
        pub fn matches(&self, rfq: &Rfq) -> bool {
            if self.status.is_some_and(|s| s != rfq.status) {
                return false;
            }
            if self.company_id.is_some_and(|c| c != rfq.company_id) {
                return false;
            }
            self.location.as_ref().map_or(true, |pattern| {
                let location: &str = rfq.location.as_ref();
                let location = location.to_lowercase();
                let pattern: &str = pattern.as_ref();
                pattern
                    .split_whitespace()
                    .any(|word| location.contains(&word.to_lowercase()))
            })
        }
    }

    /// Total count of [`Rfq`] list items passing a [`Filter`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
