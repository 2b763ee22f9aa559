use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::Error;

/// A half-open range of absolute row indexes, `[from, to)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub from: usize,
    pub to: usize, // exclusive
}

impl RowRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Builds a range from signed bounds as reported by some hosts.
    ///
    /// Fails with [`Error::InvalidRange`] when `from` is negative or `from >= to`.
    pub fn try_from_signed(from: i64, to: i64) -> Result<Self, Error> {
        if from < 0 || from >= to {
            return Err(Error::InvalidRange { from, to });
        }
        Ok(Self {
            from: from as usize,
            to: to as usize,
        })
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.from && index < self.to
    }
}

/// Scan direction of the resolver, derived from the last known top-of-viewport row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    /// `Forward` unless `top` moved above the previous position. An unknown previous position
    /// always scans forward.
    pub fn between(previous_top: Option<usize>, top: usize) -> Self {
        match previous_top {
            Some(prev) if top < prev => Self::Backward,
            _ => Self::Forward,
        }
    }
}

/// Size of the server-side dataset as last reported.
///
/// `Unknown` is distinct from `Known(0)`: an unknown total never blocks a fetch, a known total
/// blocks fetches that lie entirely past the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Total {
    #[default]
    Unknown,
    Known(usize),
}

impl Total {
    pub fn known(self) -> Option<usize> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    /// Row count to report to a grid: an unknown total renders as no rows.
    pub fn row_count(self) -> usize {
        self.known().unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// Wire value of the `sortDir` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Ascending => "true",
            Self::Descending => "false",
        }
    }
}

impl From<bool> for SortDirection {
    fn from(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// A fetch of rows `[from, to)` under the current sort and filter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    pub from: usize,
    pub to: usize, // exclusive
    /// Empty when no sort column is configured.
    pub sort_column: String,
    pub sort_direction: SortDirection,
    pub extra: BTreeMap<String, String>,
}

impl Query {
    pub fn range(&self) -> RowRange {
        RowRange::new(self.from, self.to)
    }

    /// Flattens the query into request parameters.
    ///
    /// Extra parameters come first; `from`, `to`, `sortCol` and `sortDir` always win on a key
    /// collision.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = self.extra.clone();
        params.insert("from".to_string(), self.from.to_string());
        params.insert("to".to_string(), self.to.to_string());
        params.insert("sortCol".to_string(), self.sort_column.clone());
        params.insert(
            "sortDir".to_string(),
            self.sort_direction.as_param().to_string(),
        );
        params
    }
}

/// A server payload. `records[i]` belongs at row `range.from + i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<R> {
    /// `None` for payloads that carry no rows (e.g. an acknowledgement of a host action).
    pub range: Option<RowRange>,
    /// Authoritative dataset size as of this response. Ignored when `range` is `None`.
    pub total: usize,
    pub records: Vec<R>,
    /// Side payload forwarded to data-loaded listeners (e.g. a `flash` message).
    pub extra: BTreeMap<String, String>,
}

impl<R> Response<R> {
    pub fn rows(from: usize, to: usize, total: usize, records: Vec<R>) -> Self {
        Self {
            range: Some(RowRange::new(from, to)),
            total,
            records,
            extra: BTreeMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            range: None,
            total: 0,
            records: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Identity of a submitted request. Ids are never reused within one model instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// An outgoing request handed to the [`crate::Transport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub method: Method,
    /// `None` targets the host's default endpoint.
    pub url: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl Request {
    pub fn get(url: Option<String>) -> Self {
        Self {
            method: Method::Get,
            url,
            params: BTreeMap::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: Some(url.into()),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}
