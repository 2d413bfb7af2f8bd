//! Composable read directives handed to the persistence collaborator.

/// Page window. Only emitted for a positive limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub descending: bool,
}

/// Exact-match filter on one field. The value is passed through as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

/// Eager-load of a dotted relation path. `scope` is applied to the loaded association:
/// its page/order/filter constrain the related records and its preload paths are
/// relative to `path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preload {
    pub path: String,
    pub scope: Vec<QueryOption>,
}

impl Preload {
    pub fn path(path: impl Into<String>) -> Self {
        Preload {
            path: path.into(),
            scope: Vec::new(),
        }
    }

    pub fn scoped(path: impl Into<String>, scope: Vec<QueryOption>) -> Self {
        Preload {
            path: path.into(),
            scope,
        }
    }
}

/// One read directive. Page/OrderBy/FilterBy are expected at most once per list
/// (a later one overwrites an earlier one); every Preload adds a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOption {
    Page(Page),
    OrderBy(Order),
    FilterBy(Filter),
    Preload(Preload),
}

impl QueryOption {
    pub fn page(limit: u64, offset: u64) -> Self {
        QueryOption::Page(Page { limit, offset })
    }

    pub fn order_by(field: impl Into<String>, descending: bool) -> Self {
        QueryOption::OrderBy(Order {
            field: field.into(),
            descending,
        })
    }

    pub fn filter_by(field: impl Into<String>, value: impl Into<String>) -> Self {
        QueryOption::FilterBy(Filter {
            field: field.into(),
            value: value.into(),
        })
    }

    pub fn preload(path: impl Into<String>) -> Self {
        QueryOption::Preload(Preload::path(path))
    }

    pub fn is_preload(&self) -> bool {
        matches!(self, QueryOption::Preload(_))
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            QueryOption::FilterBy(f) => Some(f),
            _ => None,
        }
    }
}
