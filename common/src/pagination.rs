//! Abstractions for cursor-based pagination.

/// Page of nodes with the cursors pointing to them.
#[derive(Clone, Debug)]
pub struct Connection<C, I> {
    /// [`Edge`]s in this [`Connection`], ordered by their cursors ascending.
    pub edges: Vec<Edge<C, I>>,

    /// [`Direction`] this [`Connection`] was fetched in.
    pub direction: Direction,

    /// Indicator whether there are more nodes in the [`Direction`].
    pub has_more: bool,
}

/// A page in a [`Connection`].
pub type Page<C, I> = Connection<C, I>;

impl<C, I> Connection<C, I> {
    /// Creates a new [`Connection`] out of the fetched rows.
    ///
    /// `rows` are expected to be fetched with [`Arguments::fetch_limit()`]
    /// moving away from the cursor, so the redundant last row only indicates
    /// there are more nodes.
    #[must_use]
    pub fn from_rows<E>(args: &Arguments<C>, rows: Vec<E>) -> Self
    where
        E: Into<Edge<C, I>>,
    {
        let has_more = rows.len() > args.limit;
        let mut edges = rows
            .into_iter()
            .take(args.limit)
            .map(Into::into)
            .collect::<Vec<_>>();
        if args.direction == Direction::Backward {
            edges.reverse();
        }
        Self {
            edges,
            direction: args.direction,
            has_more,
        }
    }

    /// Returns [`PageInfo`] of this [`Connection`].
    #[must_use]
    pub fn page_info(&self) -> PageInfo<C>
    where
        C: Clone,
    {
        PageInfo {
            start_cursor: self.edges.first().map(|e| e.cursor.clone()),
            end_cursor: self.edges.last().map(|e| e.cursor.clone()),
            has_next_page: self.has_more
                && self.direction == Direction::Forward,
            has_previous_page: self.has_more
                && self.direction == Direction::Backward,
        }
    }
}

/// Information about a page in a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct PageInfo<C> {
    /// First cursor on this page.
    pub start_cursor: Option<C>,

    /// Last cursor on this page.
    pub end_cursor: Option<C>,

    /// Indicator whether [`Connection`] has a next page.
    pub has_next_page: bool,

    /// Indicator whether [`Connection`] has a previous page.
    pub has_previous_page: bool,
}

/// An edge in a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, I> {
    /// Cursor of this [`Edge`].
    pub cursor: C,

    /// Node of this [`Edge`].
    pub node: I,
}

impl<C, I> From<(C, I)> for Edge<C, I> {
    fn from((cursor, node): (C, I)) -> Self {
        Self { cursor, node }
    }
}

/// Pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments<C> {
    /// Number of nodes to return.
    pub limit: usize,

    /// Cursor to start after (exclusive), if any.
    pub cursor: Option<C>,

    /// [`Direction`] to move from the `cursor` in.
    pub direction: Direction,
}

impl<C> Arguments<C> {
    /// Creates new [`Arguments`] out of Relay-style `first`/`after` and
    /// `last`/`before` pairs.
    ///
    /// [`None`] is returned if the arguments mix both directions or the
    /// number of nodes is negative.
    pub fn new<Num>(
        first: Option<Num>,
        after: Option<C>,
        last: Option<Num>,
        before: Option<C>,
        default: Num,
    ) -> Option<Self>
    where
        Num: TryInto<usize>,
    {
        let (limit, cursor, direction) = match (first, after, last, before) {
            (None, None, None, None) => (default, None, Direction::Forward),
            (first, after, None, None) => {
                (first.unwrap_or(default), after, Direction::Forward)
            }
            (None, None, Some(last), before) => {
                (last, before, Direction::Backward)
            }
            _ => return None,
        };
        Some(Self {
            limit: limit.try_into().ok()?,
            cursor,
            direction,
        })
    }

    /// Returns the number of rows to fetch: one more than the `limit`, so the
    /// presence of the next page can be detected.
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        self.limit.saturating_add(1)
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C, F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments<C>,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Direction of pagination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// Moving towards greater cursors.
    Forward,

    /// Moving towards lesser cursors.
    Backward,
}

impl Direction {
    /// Returns comparison operator selecting the nodes after a cursor in this
    /// [`Direction`].
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Forward => ">",
            Self::Backward => "<",
        }
    }

    /// Returns SQL order representing this [`Direction`].
    #[must_use]
    pub const fn sql_order(&self) -> &'static str {
        match self {
            Self::Forward => "ASC",
            Self::Backward => "DESC",
        }
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty, $filter:ty) => {
        #[doc = "Edge of a [`Connection`]."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "A [`Connection`] of nodes."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo<$cursor>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$cursor, $filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Connection, Direction};

    #[test]
    fn arguments_directions() {
        assert_eq!(
            Arguments::<u8>::new(None, None, None, None, 10),
            Some(Arguments {
                limit: 10,
                cursor: None,
                direction: Direction::Forward,
            }),
        );
        assert_eq!(
            Arguments::new(Some(5), Some(3_u8), None, None, 10),
            Some(Arguments {
                limit: 5,
                cursor: Some(3),
                direction: Direction::Forward,
            }),
        );
        assert_eq!(
            Arguments::new(None, None, Some(2), Some(7_u8), 10),
            Some(Arguments {
                limit: 2,
                cursor: Some(7),
                direction: Direction::Backward,
            }),
        );
    }

    #[test]
    fn arguments_reject_ambiguity() {
        assert!(Arguments::new(Some(1), None, Some(1), None::<u8>, 10)
            .is_none());
        assert!(Arguments::new(None, Some(1_u8), Some(1), None, 10).is_none());
        assert!(Arguments::<u8>::new(Some(-1), None, None, None, 10).is_none());
    }

    #[test]
    fn connection_detects_more_rows() {
        let args = Arguments::<u8>::new(Some(2), None, None, None, 10).unwrap();
        assert_eq!(args.fetch_limit(), 3);

        let page: Connection<u8, u8> =
            Connection::from_rows(&args, vec![(1, 1), (2, 2), (3, 3)]);
        assert_eq!(page.edges.len(), 2);
        let info = page.page_info();
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
        assert_eq!(info.start_cursor, Some(1));
        assert_eq!(info.end_cursor, Some(2));

        let page: Connection<u8, u8> =
            Connection::from_rows(&args, vec![(1, 1)]);
        assert!(!page.page_info().has_next_page);
    }

    #[test]
    fn backward_connection_is_ascending() {
        let args = Arguments::<u8>::new(None, None, Some(2), Some(9), 10)
            .unwrap();

        let page: Connection<u8, u8> =
            Connection::from_rows(&args, vec![(8, 8), (7, 7), (6, 6)]);
        let cursors = page.edges.iter().map(|e| e.cursor).collect::<Vec<_>>();
        assert_eq!(cursors, [7, 8]);

        let info = page.page_info();
        assert!(info.has_previous_page);
        assert!(!info.has_next_page);
        assert_eq!(info.start_cursor, Some(7));
    }
}
