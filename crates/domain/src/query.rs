//! Query descriptor for item, user, role and file endpoints
//!
//! A [`Query`] is built fluently and rendered either as URL query pairs for
//! REST calls or as a JSON object for realtime subscriptions.
//!
//! ```rust
//! use serde_json::json;
//! use vellum_domain::Query;
//!
//! let query = Query::new()
//!     .fields(["id", "title", "author.name"])
//!     .filter(json!({"status": {"_eq": "published"}}))
//!     .sort(["-date_created"])
//!     .limit(10);
//!
//! let pairs = query.to_query_pairs();
//! assert_eq!(pairs[0], ("fields".to_string(), "id,title,author.name".to_string()));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters accepted by collection endpoints.
///
/// List setters (`fields`, `sort`, `meta`, `group_by`) append to what is
/// already set; scalar setters overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Sort fields; a leading `-` sorts descending.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,

    /// Row limit, `-1` returns every row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Requested metadata, e.g. `total_count`, `filter_count` or `*`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, String>,

    /// Aggregate function name to the fields it applies to.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggregate: BTreeMap<String, Vec<String>>,

    #[serde(rename = "groupBy", default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort.extend(sort.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn meta<I, S>(mut self, meta: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.extend(meta.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn deep(mut self, deep: Value) -> Self {
        self.deep = Some(deep);
        self
    }

    #[must_use]
    pub fn alias(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.alias.insert(name.into(), field.into());
        self
    }

    #[must_use]
    pub fn aggregate(mut self, function: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate.entry(function.into()).or_default().push(field.into());
        self
    }

    #[must_use]
    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Render as URL query pairs in a stable order, omitting unset values.
    ///
    /// JSON-valued parameters (`filter`, `deep`) are encoded compactly; the
    /// HTTP layer takes care of percent-encoding.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        push_list(&mut pairs, "fields", &self.fields);
        if let Some(filter) = &self.filter {
            pairs.push(("filter".to_string(), filter.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        push_list(&mut pairs, "sort", &self.sort);
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        push_list(&mut pairs, "meta", &self.meta);
        if let Some(deep) = &self.deep {
            pairs.push(("deep".to_string(), deep.to_string()));
        }
        for (name, field) in &self.alias {
            pairs.push((format!("alias[{name}]"), field.clone()));
        }
        for (function, fields) in &self.aggregate {
            pairs.push((format!("aggregate[{function}]"), fields.join(",")));
        }
        push_list(&mut pairs, "groupBy", &self.group_by);

        pairs
    }
}

fn push_list(pairs: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    if !values.is_empty() {
        pairs.push((key.to_string(), values.join(",")));
    }
}
