use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::{Query, SortDirection};

/// Configuration for [`crate::RemoteModel`].
///
/// The sort and filter fields are what every outgoing [`Query`] carries; change them at runtime
/// through `RemoteModel::set_sorting` / `RemoteModel::set_filter_args` so the cache is
/// invalidated.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteModelOptions {
    /// Endpoint for row fetches. `None` lets the transport use its default.
    pub url: Option<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    /// Additional parameters sent with every fetch (filters, search text).
    pub extra_query: BTreeMap<String, String>,
    /// Smallest number of rows loaded per fetch. `None` or `0` loads exactly the gap.
    pub minimum_load: Option<usize>,
}

impl RemoteModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_sorting(
        mut self,
        sort_column: impl Into<String>,
        sort_direction: SortDirection,
    ) -> Self {
        self.sort_column = Some(sort_column.into());
        self.sort_direction = sort_direction;
        self
    }

    pub fn with_extra_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_query.insert(key.into(), value.into());
        self
    }

    pub fn with_minimum_load(mut self, minimum_load: usize) -> Self {
        self.minimum_load = Some(minimum_load);
        self
    }

    /// A query for `[from, to)` under the current sort and filter settings.
    pub fn query(&self, from: usize, to: usize) -> Query {
        Query {
            from,
            to,
            sort_column: self.sort_column.clone().unwrap_or_default(),
            sort_direction: self.sort_direction,
            extra: self.extra_query.clone(),
        }
    }
}

impl core::fmt::Debug for RemoteModelOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteModelOptions")
            .field("url", &self.url)
            .field("sort_column", &self.sort_column)
            .field("sort_direction", &self.sort_direction)
            .field("extra_query", &self.extra_query.len())
            .field("minimum_load", &self.minimum_load)
            .finish()
    }
}
